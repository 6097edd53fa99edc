// Neighbor ranking: the "dimension approach".
//
// Take a seed term's nearest neighbors in the calibrated space, score each
// by |projection| onto the calibrated axis, and keep the most loaded ones.
// Neighbors with equal scores stay in the space's own proximity order
// (stable sort), so the same inputs always produce the same list.

use tracing::{debug, info};

use crate::axis::{loadedness, SemanticAxis};
use crate::embedding::EmbeddingSpace;
use crate::error::ScoreError;

use super::scored::{RankedTable, ScoredTerm};

/// Knobs for one ranking session.
#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    /// How many nearest neighbors to pull per seed
    pub neighbor_count: usize,
    /// How many scored neighbors to keep per seed
    pub top_n: usize,
    /// Drop neighbors whose similarity to the seed is at or below this
    pub similarity_threshold: Option<f64>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            neighbor_count: 50,
            top_n: 10,
            similarity_threshold: None,
        }
    }
}

/// Rank the neighbors of one seed by how strongly they load on `axis`.
///
/// Fails with `OutOfVocabulary` if the seed isn't in the space. Neighbors
/// that can't be projected (zero-norm vectors) are skipped.
pub fn rank(
    space: &dyn EmbeddingSpace,
    axis: &SemanticAxis,
    seed: &str,
    options: &RankOptions,
) -> Result<Vec<ScoredTerm>, ScoreError> {
    let (rows, _) = rank_counting(space, axis, seed, options)?;
    Ok(rows)
}

fn rank_counting(
    space: &dyn EmbeddingSpace,
    axis: &SemanticAxis,
    seed: &str,
    options: &RankOptions,
) -> Result<(Vec<ScoredTerm>, usize), ScoreError> {
    let neighbors = space.nearest_neighbors(seed, options.neighbor_count)?;
    let mut skipped = 0usize;
    let mut scored: Vec<ScoredTerm> = Vec::with_capacity(neighbors.len());

    for neighbor in neighbors {
        if let Some(threshold) = options.similarity_threshold {
            if neighbor.similarity <= threshold {
                continue;
            }
        }
        match loadedness(space, &neighbor.term, axis) {
            Ok(score) => scored.push(ScoredTerm::new(neighbor.term, score, seed)),
            Err(e) if e.is_recoverable() => {
                debug!(seed, neighbor = %neighbor.term, error = %e, "Neighbor skipped");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    // sort_by is stable: equal scores keep proximity order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(options.top_n);
    Ok((scored, skipped))
}

/// What a ranking session couldn't use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankReport {
    /// Seeds that produced rows (possibly zero rows after filtering)
    pub seeds_ranked: usize,
    /// Seeds absent from the space, in input order
    pub missing_seeds: Vec<String>,
    /// Neighbors dropped because they couldn't be projected
    pub skipped_neighbors: usize,
}

/// A ranking session over one space and one calibrated axis.
pub struct NeighborRanker<'a> {
    space: &'a dyn EmbeddingSpace,
    axis: &'a SemanticAxis,
    options: RankOptions,
}

impl<'a> NeighborRanker<'a> {
    pub fn new(space: &'a dyn EmbeddingSpace, axis: &'a SemanticAxis, options: RankOptions) -> Self {
        Self {
            space,
            axis,
            options,
        }
    }

    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    pub fn rank(&self, seed: &str) -> Result<Vec<ScoredTerm>, ScoreError> {
        rank(self.space, self.axis, seed, &self.options)
    }

    /// Rank every seed and fold the results into one table.
    ///
    /// A neighbor reached from several seeds keeps its highest score and the
    /// seed that produced it. Seeds missing from the space are reported, not
    /// fatal. The returned table is sorted.
    pub fn rank_all<S: AsRef<str>>(
        &self,
        seeds: &[S],
    ) -> Result<(RankedTable, RankReport), ScoreError> {
        let mut table = RankedTable::new();
        let mut report = RankReport::default();

        for seed in seeds {
            let seed = seed.as_ref();
            match rank_counting(self.space, self.axis, seed, &self.options) {
                Ok((rows, skipped)) => {
                    report.seeds_ranked += 1;
                    report.skipped_neighbors += skipped;
                    for row in rows {
                        table.insert_max(row);
                    }
                }
                Err(e) if e.is_recoverable() => {
                    debug!(seed, error = %e, "Seed skipped");
                    report.missing_seeds.push(seed.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            space = self.space.id(),
            axis = %self.axis.name,
            seeds = report.seeds_ranked,
            missing = report.missing_seeds.len(),
            rows = table.len(),
            "Neighbor ranking complete"
        );
        Ok((table.sorted(), report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::build_axis;
    use crate::embedding::VectorTable;

    // Axis along x. "seed" sits near everything; neighbors differ in how
    // much of their direction is x.
    fn space() -> VectorTable {
        VectorTable::from_entries(
            "toy",
            vec![
                ("left", vec![1.0, 0.0, 0.0]),
                ("right", vec![-1.0, 0.0, 0.0]),
                ("seed", vec![0.5, 0.5, 0.5]),
                ("strong", vec![0.9, 0.4, 0.1]),
                ("weak", vec![0.1, 0.6, 0.6]),
                ("mid", vec![0.5, 0.6, 0.2]),
            ],
        )
        .unwrap()
    }

    fn axis(s: &VectorTable) -> SemanticAxis {
        build_axis(s, &["left".to_string()], &["right".to_string()]).unwrap()
    }

    #[test]
    fn test_rank_orders_by_loadedness() {
        let s = space();
        let a = axis(&s);
        let opts = RankOptions {
            neighbor_count: 5,
            top_n: 3,
            similarity_threshold: None,
        };
        let rows = rank(&s, &a, "seed", &opts).unwrap();
        assert_eq!(rows.len(), 3);
        // left and right both score 1.0; they lead in proximity order
        assert!((rows[0].score - 1.0).abs() < 1e-9);
        assert!((rows[1].score - 1.0).abs() < 1e-9);
        assert_eq!(rows[2].term, "strong");
        assert!(rows.iter().all(|r| r.sources_joined() == "seed"));
        for pair in rows.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_rank_unknown_seed() {
        let s = space();
        let err = rank(&s, &axis(&s), "ghost", &RankOptions::default()).unwrap_err();
        assert!(matches!(err, ScoreError::OutOfVocabulary { .. }));
    }

    #[test]
    fn test_threshold_is_strict() {
        let s = space();
        let a = axis(&s);
        let sim = s.similarity("seed", "strong").unwrap();
        let opts = RankOptions {
            neighbor_count: 10,
            top_n: 10,
            similarity_threshold: Some(sim),
        };
        let rows = rank(&s, &a, "seed", &opts).unwrap();
        assert!(rows.iter().all(|r| r.term != "strong"));
        assert!(rows.iter().all(|r| s.similarity("seed", &r.term).unwrap() > sim));
    }

    #[test]
    fn test_rank_all_keeps_max_and_reports_missing() {
        let s = space();
        let a = axis(&s);
        let ranker = NeighborRanker::new(&s, &a, RankOptions::default());
        let (table, report) = ranker.rank_all(&["seed", "ghost", "weak"]).unwrap();
        assert_eq!(report.seeds_ranked, 2);
        assert_eq!(report.missing_seeds, vec!["ghost"]);
        // "strong" is reachable from both seeds with the same score; the first seed keeps it
        assert_eq!(table.get("strong").unwrap().sources_joined(), "seed");
        for pair in table.rows().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_rank_is_deterministic() {
        let s = space();
        let a = axis(&s);
        let opts = RankOptions::default();
        assert_eq!(
            rank(&s, &a, "seed", &opts).unwrap(),
            rank(&s, &a, "seed", &opts).unwrap()
        );
    }
}
