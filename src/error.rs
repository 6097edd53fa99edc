// Scoring errors: the typed failure taxonomy of the core.
//
// Vocabulary misses and zero-norm vectors are expected during batch work and
// the caller skips past them. An empty pole only disqualifies one axis
// definition. NoCandidate is the one core failure that aborts a run.
//
// Anything touching the filesystem or configuration uses anyhow instead, so
// callers can tell "term missing" apart from "something is actually broken".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of an axis definition a word belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pole {
    Left,
    Right,
}

impl Pole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pole::Left => "left",
            Pole::Right => "right",
        }
    }
}

impl fmt::Display for Pole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    /// The term has no vector in the given space.
    #[error("'{term}' is not in the vocabulary of {space}")]
    OutOfVocabulary { term: String, space: String },

    /// None of an axis pole's words exist in the space, so its mean is undefined.
    #[error("axis '{axis}' has no {pole} words in the vocabulary of {space}")]
    EmptyPole {
        axis: String,
        pole: Pole,
        space: String,
    },

    /// Cosine similarity against a zero-norm vector has no direction.
    #[error("zero-norm vector has no direction")]
    DegenerateVector,

    /// A vector from one space was used against a space of another width.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A buzzword score was requested against zero reference terms.
    #[error("reference term set is empty")]
    EmptyReferenceSet,

    /// Every (space, axis definition) pair was excluded from calibration.
    #[error("no (space, axis definition) pair could be evaluated against the labeled set")]
    NoCandidate,
}

impl ScoreError {
    /// Whether a batch should skip this item and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScoreError::OutOfVocabulary { .. } | ScoreError::DegenerateVector
        )
    }
}
