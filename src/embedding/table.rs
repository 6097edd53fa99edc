// In-memory vector table: the default EmbeddingSpace implementation.
//
// Rows live in one flat row-major f32 buffer with a term → row index and
// precomputed norms. Nearest-neighbor search is exhaustive cosine over every
// row; that's fine for the vocabulary sizes this tool works with and keeps
// the ordering fully deterministic.

use std::collections::HashMap;

use anyhow::Result;
use tracing::debug;

use super::math;
use super::traits::{EmbeddingSpace, Neighbor};

#[derive(Debug)]
pub struct VectorTable {
    id: String,
    dim: usize,
    terms: Vec<String>,
    index: HashMap<String, usize>,
    data: Vec<f32>,
    norms: Vec<f64>,
}

impl VectorTable {
    /// Create an empty table for vectors of width `dim`.
    pub fn new(id: impl Into<String>, dim: usize) -> Self {
        Self {
            id: id.into(),
            dim,
            terms: Vec::new(),
            index: HashMap::new(),
            data: Vec::new(),
            norms: Vec::new(),
        }
    }

    /// Try to reserve room for `additional` more rows. A request that
    /// can't be met is dropped; rows still grow on insert.
    pub fn reserve(&mut self, additional: usize) {
        let Some(values) = additional.checked_mul(self.dim) else {
            return;
        };
        let ok = self.terms.try_reserve(additional).is_ok()
            && self.index.try_reserve(additional).is_ok()
            && self.data.try_reserve(values).is_ok()
            && self.norms.try_reserve(additional).is_ok();
        if !ok {
            debug!(id = %self.id, additional, "Reservation declined");
        }
    }

    /// Build a table from (term, vector) pairs. Width is taken from the first vector.
    pub fn from_entries<I, S>(id: impl Into<String>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut iter = entries.into_iter().peekable();
        let dim = iter.peek().map(|(_, v)| v.len()).unwrap_or(0);
        let mut table = Self::new(id, dim);
        for (term, vector) in iter {
            table.insert(term, &vector)?;
        }
        Ok(table)
    }

    /// Add a term, or replace its vector if already present.
    pub fn insert(&mut self, term: impl Into<String>, vector: &[f32]) -> Result<()> {
        let term = term.into();
        if vector.len() != self.dim {
            anyhow::bail!(
                "Vector for '{}' has {} dimensions, but {} expects {}",
                term,
                vector.len(),
                self.id,
                self.dim
            );
        }

        let norm = math::norm(vector);
        match self.index.get(&term) {
            Some(&row) => {
                let start = row * self.dim;
                self.data[start..start + self.dim].copy_from_slice(vector);
                self.norms[row] = norm;
            }
            None => {
                let row = self.terms.len();
                self.data.extend_from_slice(vector);
                self.norms.push(norm);
                self.index.insert(term.clone(), row);
                self.terms.push(term);
            }
        }
        Ok(())
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    fn row(&self, row: usize) -> &[f32] {
        let start = row * self.dim;
        &self.data[start..start + self.dim]
    }
}

impl EmbeddingSpace for VectorTable {
    fn id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        self.terms.len()
    }

    fn vector_of(&self, term: &str) -> Option<&[f32]> {
        self.index.get(term).map(|&row| self.row(row))
    }

    fn nearest_to_vector(&self, vector: &[f32], k: usize, exclude: Option<&str>) -> Vec<Neighbor> {
        if k == 0 || vector.len() != self.dim {
            return Vec::new();
        }

        let query_norm = math::norm(vector);
        if query_norm == 0.0 || !query_norm.is_finite() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = self
            .terms
            .iter()
            .enumerate()
            .filter(|(_, term)| exclude != Some(term.as_str()))
            .filter(|&(row, _)| self.norms[row] > 0.0)
            .filter_map(|(row, _)| {
                let sim = math::dot(vector, self.row(row)) / (query_norm * self.norms[row]);
                sim.is_finite().then_some((row, sim.clamp(-1.0, 1.0)))
            })
            .collect();

        // Stable sort: equal similarities keep insertion order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(row, similarity)| Neighbor {
                term: self.terms[row].clone(),
                similarity,
            })
            .collect()
    }
}
