use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use polaxis::axis::{build_axis_for, project, SemanticAxis};
use polaxis::calibration::{evaluate_grid, pick_best, CalibrationRecord};
use polaxis::config::Config;
use polaxis::embedding::loader::{load_space, load_spaces_from_dir};
use polaxis::embedding::{EmbeddingSpace, VectorTable};
use polaxis::output::{csv, terminal};
use polaxis::ranking::{buzzword, merge_all, NeighborRanker, RankedTable};
use polaxis::seeds::{load_seeds, partition_by_vocabulary};

const DIMENSION_CSV: &str = "dimension_approach.csv";
const BUZZWORDS_CSV: &str = "buzzwords_approach.csv";
const JOINED_CSV: &str = "joined.csv";

/// Polaxis: find politically loaded terms with word embeddings.
///
/// Calibrates a semantic axis against labeled terms, then ranks the
/// neighborhoods of known sensitive terms along it.
#[derive(Parser)]
#[command(name = "polaxis", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick the best (embedding space, axis definition) pair and save it
    Calibrate {
        /// Directory of embedding files (overrides POLAXIS_MODELS_DIR)
        #[arg(long)]
        models_dir: Option<PathBuf>,

        /// JSON file of axis definitions (overrides POLAXIS_DIMENSIONS)
        #[arg(long)]
        dimensions: Option<PathBuf>,

        /// JSON file of term → 0|1 labels (overrides POLAXIS_LABELS)
        #[arg(long)]
        labels: Option<PathBuf>,
    },

    /// Rank seed-term neighbors by loadedness on the calibrated axis
    Rank {
        #[command(flatten)]
        input: InputArgs,

        /// Neighbors kept per seed (overrides POLAXIS_TOP_N)
        #[arg(long)]
        top_n: Option<usize>,

        /// Only keep neighbors more similar than this to their seed
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Score seed-term neighbors by similarity to reference buzzwords
    Buzzwords {
        #[command(flatten)]
        input: InputArgs,

        /// Reference terms, comma separated (overrides POLAXIS_BUZZWORDS)
        #[arg(long, value_delimiter = ',')]
        buzzwords: Vec<String>,

        /// Minimum seed similarity (overrides POLAXIS_THRESHOLD)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Normalize and merge ranked CSV tables
    Merge {
        /// Tables to merge (default: the rank and buzzwords outputs)
        inputs: Vec<PathBuf>,

        /// Output file (default: <output dir>/joined.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print signed projections of words on the calibrated axis
    Project {
        /// Words to project
        #[arg(required = true)]
        words: Vec<String>,

        /// Embedding file (default: the calibrated space)
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Run rank, buzzwords and merge in one go
    Pipeline {
        #[command(flatten)]
        input: InputArgs,

        /// Reference terms, comma separated (overrides POLAXIS_BUZZWORDS)
        #[arg(long, value_delimiter = ',')]
        buzzwords: Vec<String>,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Seed term list (overrides POLAXIS_SEEDS)
    #[arg(long)]
    seeds: Option<PathBuf>,

    /// Embedding file (default: the calibrated space)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Nearest neighbors pulled per seed (overrides POLAXIS_NEIGHBORS)
    #[arg(long)]
    neighbors: Option<usize>,
}

impl InputArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(seeds) = &self.seeds {
            config.seeds_path = Some(seeds.clone());
        }
        if let Some(n) = self.neighbors {
            config.neighbor_count = n;
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("polaxis=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Calibrate {
            models_dir,
            dimensions,
            labels,
        } => {
            if let Some(dir) = models_dir {
                config.models_dir = dir;
            }
            if dimensions.is_some() {
                config.dimensions_path = dimensions;
            }
            if labels.is_some() {
                config.labels_path = labels;
            }
            run_calibrate(&config)?;
        }

        Commands::Rank {
            input,
            top_n,
            threshold,
        } => {
            input.apply(&mut config);
            if let Some(n) = top_n {
                config.top_n = n;
            }
            let record = CalibrationRecord::load(&config.calibration_path)?;
            let space = open_space(&config, input.model.as_deref(), Some(&record))?;
            let axis = calibrated_axis(&space, &record)?;
            let table = run_rank(&config, &space, &axis, threshold)?;
            csv::write_table(&config.output_file(DIMENSION_CSV), &table)?;
        }

        Commands::Buzzwords {
            input,
            buzzwords,
            threshold,
        } => {
            input.apply(&mut config);
            if !buzzwords.is_empty() {
                config.buzzwords = buzzwords;
            }
            if let Some(t) = threshold {
                config.similarity_threshold = t;
            }
            // The calibrated space is only a default here
            let record = CalibrationRecord::load(&config.calibration_path).ok();
            let space = open_space(&config, input.model.as_deref(), record.as_ref())?;
            let table = run_buzzwords(&config, &space)?;
            csv::write_table(&config.output_file(BUZZWORDS_CSV), &table)?;
        }

        Commands::Merge { inputs, output } => {
            let inputs = if inputs.is_empty() {
                vec![
                    config.output_file(DIMENSION_CSV),
                    config.output_file(BUZZWORDS_CSV),
                ]
            } else {
                inputs
            };
            if inputs.len() < 2 {
                anyhow::bail!("Merge needs at least two tables, got {}", inputs.len());
            }
            let tables = inputs
                .iter()
                .map(|p| csv::read_table(p))
                .collect::<Result<Vec<_>>>()?;
            let merged = merge_all(&tables);
            let output = output.unwrap_or_else(|| config.output_file(JOINED_CSV));
            csv::write_table(&output, &merged)?;
            terminal::display_ranked_table("Merged", &merged, 25);
            println!("\n  Saved to {}", output.display());
        }

        Commands::Project { words, model } => {
            let record = CalibrationRecord::load(&config.calibration_path)?;
            let space = open_space(&config, model.as_deref(), Some(&record))?;
            let axis = calibrated_axis(&space, &record)?;
            let projections: Vec<_> = words
                .into_iter()
                .map(|w| {
                    let p = project(&space, &w, &axis);
                    (w, p)
                })
                .collect();
            terminal::display_projections(&record.axis.name, &projections);
        }

        Commands::Pipeline { input, buzzwords } => {
            input.apply(&mut config);
            if !buzzwords.is_empty() {
                config.buzzwords = buzzwords;
            }
            let record = CalibrationRecord::load(&config.calibration_path)?;
            let space = open_space(&config, input.model.as_deref(), Some(&record))?;
            let axis = calibrated_axis(&space, &record)?;

            let ranked = run_rank(&config, &space, &axis, None)?;
            csv::write_table(&config.output_file(DIMENSION_CSV), &ranked)?;

            let buzz = run_buzzwords(&config, &space)?;
            csv::write_table(&config.output_file(BUZZWORDS_CSV), &buzz)?;

            let merged = merge_all([&ranked, &buzz]);
            let joined = config.output_file(JOINED_CSV);
            csv::write_table(&joined, &merged)?;

            terminal::display_ranked_table("Merged", &merged, 25);
            println!("\n{}", "Pipeline complete.".bold());
            println!("  Tables written to {}", config.output_dir.display());
        }
    }

    Ok(())
}

fn run_calibrate(config: &Config) -> Result<()> {
    let models_dir = config.require_models_dir()?;
    let definitions = config.axis_definitions()?;
    let labeled = config.labeled_set()?;

    let pb = terminal::spinner(format!("Loading embedding spaces from {}", models_dir.display()))?;
    let spaces = load_spaces_from_dir(models_dir);
    pb.finish_and_clear();
    let spaces = spaces?;

    println!(
        "Calibrating {} axis definitions on {} spaces against {} labeled terms...",
        definitions.len(),
        spaces.len(),
        labeled.len()
    );

    let evaluations = evaluate_grid(&spaces, &definitions, &labeled);
    let best = pick_best(&evaluations).context(
        "No axis definition could be evaluated. Check that the pole words and \
         labeled terms exist in at least one embedding space.",
    )?;
    info!(
        space = %best.space_id,
        axis = %best.axis_name,
        mean_error = best.mean_error,
        "Calibration complete"
    );

    terminal::display_calibration_grid(&evaluations, &best);

    let record = CalibrationRecord::new(&best, definitions[best.axis_index].clone());
    record.save(&config.calibration_path)?;
    println!("\n  Saved to {}", config.calibration_path.display());
    Ok(())
}

fn run_rank(
    config: &Config,
    space: &VectorTable,
    axis: &SemanticAxis,
    threshold: Option<f64>,
) -> Result<RankedTable> {
    let seeds = seed_terms(config, space)?;
    let mut options = config.rank_options();
    options.similarity_threshold = threshold;

    let ranker = NeighborRanker::new(space, axis, options);
    let (table, report) = ranker.rank_all(&seeds)?;

    terminal::display_ranked_table("Dimension approach", &table, 25);
    terminal::display_rank_report(&report);
    Ok(table)
}

fn run_buzzwords(config: &Config, space: &VectorTable) -> Result<RankedTable> {
    let seeds = seed_terms(config, space)?;
    let (table, report) = buzzword::score(
        space,
        &seeds,
        &config.buzzwords,
        &config.buzzword_options(),
    )?;

    terminal::display_ranked_table("Buzzword approach", &table, 25);
    terminal::display_buzzword_report(&report);
    Ok(table)
}

/// Load the configured seed terms and warn when none are in the space.
fn seed_terms(config: &Config, space: &VectorTable) -> Result<Vec<String>> {
    let seeds = load_seeds(config.require_seeds()?, &config.language)?;
    let (found, missing) = partition_by_vocabulary(space, &seeds);
    info!(
        space = space.id(),
        found = found.len(),
        missing = missing.len(),
        "Seed coverage"
    );
    if found.is_empty() {
        warn!(space = space.id(), "None of the seed terms are in this space");
    }
    Ok(seeds)
}

/// Load the embedding space to work in: an explicit file, or the space
/// named in the calibration record.
fn open_space(
    config: &Config,
    model: Option<&Path>,
    record: Option<&CalibrationRecord>,
) -> Result<VectorTable> {
    let path = match (model, record) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(record)) if !record.space_id.is_empty() => {
            config.require_models_dir()?.join(&record.space_id)
        }
        _ => anyhow::bail!(
            "No embedding space to use. Pass --model, or run `polaxis calibrate` first."
        ),
    };

    let pb = terminal::spinner(format!("Loading {}", path.display()))?;
    let space = load_space(&path);
    pb.finish_and_clear();
    let space = space?;

    if let Some(record) = record {
        if !record.space_id.is_empty() && record.space_id != space.id() {
            warn!(
                calibrated = %record.space_id,
                loaded = space.id(),
                "Using a different space than the one the axis was calibrated on"
            );
        }
    }
    Ok(space)
}

fn calibrated_axis(space: &VectorTable, record: &CalibrationRecord) -> Result<SemanticAxis> {
    let axis = build_axis_for(space, &record.axis).with_context(|| {
        format!(
            "The calibrated axis '{}' can't be built in {}",
            record.axis.name,
            space.id()
        )
    })?;
    if !axis.missing.is_empty() {
        warn!(
            axis = %axis.name,
            missing = axis.missing.len(),
            "Some pole words are not in the vocabulary"
        );
    }
    Ok(axis)
}
