use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;

use crate::axis::builtin::political_dimensions;
use crate::axis::definition::load_definitions;
use crate::axis::AxisDefinition;
use crate::calibration::LabeledTestSet;
use crate::ranking::{BuzzwordOptions, RankOptions};

/// Reference terms used by the buzzword approach when none are configured.
pub const DEFAULT_BUZZWORDS: &[&str] = &["discrimination", "political"];

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// value has a default except the seed list, which only `rank`,
/// `buzzwords` and `pipeline` need.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the embedding files (.txt, .vec, .bin)
    pub models_dir: PathBuf,
    /// Where CSV tables are written
    pub output_dir: PathBuf,
    /// Where the calibration winner is persisted
    pub calibration_path: PathBuf,
    /// Optional JSON file overriding the built-in political dimensions
    pub dimensions_path: Option<PathBuf>,
    /// Optional JSON file overriding the built-in labeled set
    pub labels_path: Option<PathBuf>,
    /// Seed term list (JSON or one term per line)
    pub seeds_path: Option<PathBuf>,
    pub buzzwords: Vec<String>,
    pub neighbor_count: usize,
    pub top_n: usize,
    pub similarity_threshold: f64,
    /// Language code used to filter lemma records in the seed list
    pub language: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let output_dir = var("POLAXIS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        let calibration_path = var("POLAXIS_CALIBRATION_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| output_dir.join("best_dimension.json"));

        let buzzwords = match var("POLAXIS_BUZZWORDS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_BUZZWORDS.iter().map(|w| w.to_string()).collect(),
        };

        let neighbor_count: usize = parse_var(&var, "POLAXIS_NEIGHBORS", 50)?;
        let top_n: usize = parse_var(&var, "POLAXIS_TOP_N", 10)?;
        let similarity_threshold: f64 = parse_var(&var, "POLAXIS_THRESHOLD", 0.6)?;

        if neighbor_count == 0 {
            anyhow::bail!("POLAXIS_NEIGHBORS must be at least 1");
        }
        if !(-1.0..=1.0).contains(&similarity_threshold) {
            anyhow::bail!(
                "POLAXIS_THRESHOLD must be a cosine similarity between -1 and 1, got {similarity_threshold}"
            );
        }

        Ok(Self {
            models_dir: var("POLAXIS_MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_models_dir),
            output_dir,
            calibration_path,
            dimensions_path: var("POLAXIS_DIMENSIONS").map(PathBuf::from),
            labels_path: var("POLAXIS_LABELS").map(PathBuf::from),
            seeds_path: var("POLAXIS_SEEDS").map(PathBuf::from),
            buzzwords,
            neighbor_count,
            top_n,
            similarity_threshold,
            language: var("POLAXIS_LANGUAGE").unwrap_or_else(|| "en".to_string()),
        })
    }

    /// Check that the models directory exists.
    /// Call this before any operation that loads embedding spaces.
    pub fn require_models_dir(&self) -> Result<&Path> {
        if !self.models_dir.is_dir() {
            anyhow::bail!(
                "Models directory {} not found.\n\
                 Put word2vec/GloVe files (.txt, .vec, .bin) there, or set POLAXIS_MODELS_DIR.",
                self.models_dir.display()
            );
        }
        Ok(self.models_dir.as_path())
    }

    /// Check that a seed list is configured.
    pub fn require_seeds(&self) -> Result<&Path> {
        match &self.seeds_path {
            Some(path) => Ok(path.as_path()),
            None => anyhow::bail!(
                "No seed terms configured. Set POLAXIS_SEEDS in your .env file \
                 or pass --seeds."
            ),
        }
    }

    /// Axis definitions to calibrate: the configured file, or the built-in set.
    pub fn axis_definitions(&self) -> Result<Vec<AxisDefinition>> {
        match &self.dimensions_path {
            Some(path) => load_definitions(path),
            None => Ok(political_dimensions()),
        }
    }

    /// The labeled set to calibrate against: the configured file, or the built-in set.
    pub fn labeled_set(&self) -> Result<LabeledTestSet> {
        match &self.labels_path {
            Some(path) => LabeledTestSet::load(path),
            None => Ok(LabeledTestSet::builtin()),
        }
    }

    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            neighbor_count: self.neighbor_count,
            top_n: self.top_n,
            similarity_threshold: None,
        }
    }

    pub fn buzzword_options(&self) -> BuzzwordOptions {
        BuzzwordOptions {
            neighbor_count: self.neighbor_count,
            similarity_threshold: self.similarity_threshold,
        }
    }

    /// Path of a named output file inside the output directory.
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// Default models directory (`<data dir>/polaxis/models`).
pub fn default_models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("polaxis")
        .join("models")
}

fn parse_var<T, F>(var: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} has an invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}
