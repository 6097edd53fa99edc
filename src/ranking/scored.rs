// Scored terms and ranked tables.
//
// A RankedTable holds at most one row per term. Rows keep insertion order
// until `sorted()` is called, which orders them by score descending and
// then by term so two runs over the same input print the same file.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One candidate term with its score and the seed term(s) that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
    pub source_terms: BTreeSet<String>,
}

impl ScoredTerm {
    pub fn new(term: impl Into<String>, score: f64, source: impl Into<String>) -> Self {
        let mut source_terms = BTreeSet::new();
        source_terms.insert(source.into());
        Self {
            term: term.into(),
            score,
            source_terms,
        }
    }

    /// Source terms joined the way they're written to CSV.
    pub fn sources_joined(&self) -> String {
        self.source_terms
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Descending by score, then ascending by term.
pub fn by_score_then_term(a: &ScoredTerm, b: &ScoredTerm) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.term.cmp(&b.term))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedTable {
    rows: Vec<ScoredTerm>,
    index: HashMap<String, usize>,
}

impl RankedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ScoredTerm] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ScoredTerm> {
        self.rows
    }

    pub fn get(&self, term: &str) -> Option<&ScoredTerm> {
        self.index.get(term).map(|&i| &self.rows[i])
    }

    /// Insert a row, keeping whichever of the old and new rows scores higher.
    /// An equal score keeps the existing row. Non-finite scores are refused.
    ///
    /// Returns true if the table changed.
    pub fn insert_max(&mut self, row: ScoredTerm) -> bool {
        if !row.score.is_finite() {
            warn!(term = %row.term, score = row.score, "Dropping row with non-finite score");
            return false;
        }
        match self.index.get(&row.term) {
            Some(&i) => {
                if row.score > self.rows[i].score {
                    self.rows[i] = row;
                    true
                } else {
                    false
                }
            }
            None => {
                self.index.insert(row.term.clone(), self.rows.len());
                self.rows.push(row);
                true
            }
        }
    }

    /// Smallest and largest score, or None for an empty table.
    pub fn score_range(&self) -> Option<(f64, f64)> {
        let mut scores = self.rows.iter().map(|r| r.score);
        let first = scores.next()?;
        Some(scores.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s))))
    }

    /// The same rows, ordered by score descending then term ascending.
    pub fn sorted(mut self) -> Self {
        self.rows.sort_by(by_score_then_term);
        self.reindex();
        self
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.term.clone(), i))
            .collect();
    }
}

impl FromIterator<ScoredTerm> for RankedTable {
    fn from_iter<I: IntoIterator<Item = ScoredTerm>>(iter: I) -> Self {
        let mut table = RankedTable::new();
        for row in iter {
            table.insert_max(row);
        }
        table
    }
}
