// EmbeddingSpace trait: the one capability interface the core depends on.
//
// Like the scorer traits elsewhere in the pipeline, this keeps the scoring
// code ignorant of how vectors are stored. A file-backed table, a test
// fixture, or a future memory-mapped store all fit behind it.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// A neighbor returned by a space's native nearest-neighbor operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub term: String,
    /// The space's own similarity score (cosine for VectorTable)
    pub similarity: f64,
}

/// A read-only mapping from terms to fixed-width vectors.
///
/// Implementations must be immutable once built so any number of scorers
/// can share one instance across threads.
pub trait EmbeddingSpace: Send + Sync {
    /// Stable identifier, used to name the winning space in calibration.
    fn id(&self) -> &str;

    /// Width of every vector in this space.
    fn dim(&self) -> usize;

    /// Number of terms in the vocabulary.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, term: &str) -> bool {
        self.vector_of(term).is_some()
    }

    fn vector_of(&self, term: &str) -> Option<&[f32]>;

    /// The `k` terms nearest to `vector`, most similar first, skipping `exclude`.
    fn nearest_to_vector(&self, vector: &[f32], k: usize, exclude: Option<&str>) -> Vec<Neighbor>;

    /// The `k` nearest terms to `term`, never including `term` itself.
    fn nearest_neighbors(&self, term: &str, k: usize) -> Result<Vec<Neighbor>, ScoreError> {
        let vector = self.require(term)?;
        Ok(self.nearest_to_vector(vector, k, Some(term)))
    }

    /// Look up a vector, turning a miss into `OutOfVocabulary`.
    fn require(&self, term: &str) -> Result<&[f32], ScoreError> {
        self.vector_of(term)
            .ok_or_else(|| ScoreError::OutOfVocabulary {
                term: term.to_string(),
                space: self.id().to_string(),
            })
    }

    /// Cosine similarity between two in-vocabulary terms.
    fn similarity(&self, a: &str, b: &str) -> Result<f64, ScoreError> {
        let va = self.require(a)?;
        let vb = self.require(b)?;
        super::math::cosine_similarity(va, vb)
    }
}
