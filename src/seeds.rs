// Seed terms: the known sensitive terms whose neighborhoods get ranked.
//
// Seeds come either as JSON (an array of strings, or an array of
// `{ "lemma": ..., "lemma_lang": ... }` records from a glossary export) or as
// plain text with one term per line. Records in another language are dropped.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::embedding::EmbeddingSpace;

#[derive(Debug, Deserialize)]
struct LemmaRecord {
    lemma: String,
    #[serde(default)]
    lemma_lang: Option<String>,
}

/// Parse seed terms from file contents. JSON is detected by a leading `[`.
pub fn parse_seeds(text: &str, language: &str) -> Result<Vec<String>> {
    let raw = if text.trim_start().starts_with('[') {
        parse_json(text, language)?
    } else {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    };
    Ok(dedupe(raw))
}

fn parse_json(text: &str, language: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(text).context("Seed list is not valid JSON")?;
    let Value::Array(items) = value else {
        anyhow::bail!("Seed list must be a JSON array");
    };

    let mut terms = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match item {
            Value::String(s) => terms.push(s.trim().to_string()),
            Value::Object(_) => {
                let record: LemmaRecord = serde_json::from_value(item)
                    .with_context(|| format!("Seed entry {i} has no `lemma` string"))?;
                match record.lemma_lang.as_deref() {
                    Some(lang) if lang != language => continue,
                    _ => terms.push(record.lemma.trim().to_string()),
                }
            }
            other => anyhow::bail!("Seed entry {i} must be a string or an object, found {other}"),
        }
    }
    Ok(terms)
}

fn dedupe(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Load seed terms from a file, keeping records for `language`.
pub fn load_seeds(path: &Path, language: &str) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed terms from {}", path.display()))?;
    let seeds = parse_seeds(&text, language)
        .with_context(|| format!("Invalid seed list in {}", path.display()))?;
    if seeds.is_empty() {
        anyhow::bail!(
            "No seed terms for language '{language}' in {}",
            path.display()
        );
    }
    info!(path = %path.display(), count = seeds.len(), language, "Loaded seed terms");
    Ok(seeds)
}

/// Split terms into (in vocabulary, missing), both in input order.
pub fn partition_by_vocabulary<S: AsRef<str>>(
    space: &dyn EmbeddingSpace,
    terms: &[S],
) -> (Vec<String>, Vec<String>) {
    let (found, missing): (Vec<String>, Vec<String>) = terms
        .iter()
        .map(|t| t.as_ref().to_string())
        .partition(|t| space.contains(t));
    if !missing.is_empty() {
        debug!(space = space.id(), missing = missing.len(), "Seed terms not in vocabulary");
    }
    (found, missing)
}
