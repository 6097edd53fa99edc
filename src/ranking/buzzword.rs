// Buzzword scoring: rank neighbors by closeness to a reference vocabulary.
//
// No axis here. Each seed's close neighbors (similarity above a threshold)
// are scored by their mean cosine similarity to a fixed list of reference
// terms ("buzzwords"). A neighbor reached from several seeds keeps its best
// score and the seed that gave it.

use tracing::{debug, info, warn};

use crate::embedding::EmbeddingSpace;
use crate::error::ScoreError;

use super::scored::{RankedTable, ScoredTerm};

#[derive(Debug, Clone, PartialEq)]
pub struct BuzzwordOptions {
    pub neighbor_count: usize,
    /// Neighbors must be strictly more similar than this to their seed
    pub similarity_threshold: f64,
}

impl Default for BuzzwordOptions {
    fn default() -> Self {
        Self {
            neighbor_count: 50,
            similarity_threshold: 0.6,
        }
    }
}

/// Diagnostics from one buzzword run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuzzwordReport {
    /// Seeds absent from the space
    pub skipped_seeds: Vec<String>,
    /// Neighbors that couldn't be scored against every reference term
    pub excluded_neighbors: Vec<String>,
    /// Reference terms absent from the space
    pub missing_reference_terms: Vec<String>,
}

/// Mean cosine similarity of `term` to every reference term.
pub fn reference_similarity<R: AsRef<str>>(
    space: &dyn EmbeddingSpace,
    term: &str,
    references: &[R],
) -> Result<f64, ScoreError> {
    if references.is_empty() {
        return Err(ScoreError::EmptyReferenceSet);
    }
    let mut total = 0.0;
    for reference in references {
        total += space.similarity(term, reference.as_ref())?;
    }
    Ok(total / references.len() as f64)
}

/// Score the close neighbors of every seed against the reference terms.
pub fn score<S: AsRef<str>, R: AsRef<str>>(
    space: &dyn EmbeddingSpace,
    seeds: &[S],
    references: &[R],
    options: &BuzzwordOptions,
) -> Result<(RankedTable, BuzzwordReport), ScoreError> {
    if references.is_empty() {
        return Err(ScoreError::EmptyReferenceSet);
    }

    let mut report = BuzzwordReport::default();
    for reference in references {
        let reference = reference.as_ref();
        if !space.contains(reference) && !report.missing_reference_terms.iter().any(|m| m == reference) {
            warn!(
                term = reference,
                space = space.id(),
                "Reference term not in vocabulary, neighbors can't be scored against it"
            );
            report.missing_reference_terms.push(reference.to_string());
        }
    }

    let mut table = RankedTable::new();

    for seed in seeds {
        let seed = seed.as_ref();
        let neighbors = match space.nearest_neighbors(seed, options.neighbor_count) {
            Ok(n) => n,
            Err(e) if e.is_recoverable() => {
                debug!(seed, error = %e, "Seed skipped");
                report.skipped_seeds.push(seed.to_string());
                continue;
            }
            Err(e) => return Err(e),
        };

        for neighbor in neighbors
            .into_iter()
            .filter(|n| n.similarity > options.similarity_threshold)
        {
            match reference_similarity(space, &neighbor.term, references) {
                Ok(score) => {
                    table.insert_max(ScoredTerm::new(neighbor.term, score, seed));
                }
                Err(e) if e.is_recoverable() => {
                    debug!(seed, neighbor = %neighbor.term, error = %e, "Neighbor excluded");
                    if !report.excluded_neighbors.contains(&neighbor.term) {
                        report.excluded_neighbors.push(neighbor.term);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    info!(
        space = space.id(),
        seeds = seeds.len(),
        skipped = report.skipped_seeds.len(),
        rows = table.len(),
        "Buzzword scoring complete"
    );
    Ok((table.sorted(), report))
}

/// A buzzword scoring session bound to one space and reference list.
pub struct BuzzwordScorer<'a> {
    space: &'a dyn EmbeddingSpace,
    references: Vec<String>,
    options: BuzzwordOptions,
}

impl<'a> BuzzwordScorer<'a> {
    pub fn new(
        space: &'a dyn EmbeddingSpace,
        references: Vec<String>,
        options: BuzzwordOptions,
    ) -> Result<Self, ScoreError> {
        if references.is_empty() {
            return Err(ScoreError::EmptyReferenceSet);
        }
        Ok(Self {
            space,
            references,
            options,
        })
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn score<S: AsRef<str>>(&self, seeds: &[S]) -> Result<(RankedTable, BuzzwordReport), ScoreError> {
        score(self.space, seeds, &self.references, &self.options)
    }
}
