// Semantic axis construction.
//
// An axis is the difference between the mean vector of the left pole's
// words and the mean vector of the right pole's words, computed in one
// specific space. Words the space doesn't know are left out of the mean
// (they are not treated as zero vectors). A pole with no known words has
// no mean at all, so the axis can't exist in that space.

use std::collections::HashSet;

use tracing::debug;

use crate::embedding::math::mean_vector;
use crate::embedding::EmbeddingSpace;
use crate::error::{Pole, ScoreError};

use super::definition::AxisDefinition;

/// A direction in one embedding space, derived from an axis definition.
///
/// Only meaningful inside the space it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticAxis {
    /// Name of the definition this axis came from (empty for ad-hoc axes)
    pub name: String,
    /// Id of the space the axis was built in
    pub space_id: String,
    pub vector: Vec<f32>,
    /// Distinct left-pole words found in the space
    pub left_used: usize,
    /// Distinct right-pole words found in the space
    pub right_used: usize,
    /// Pole words the space didn't know, in definition order
    pub missing: Vec<String>,
}

impl SemanticAxis {
    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}

/// Build an axis from a named definition.
pub fn build_axis_for(
    space: &dyn EmbeddingSpace,
    definition: &AxisDefinition,
) -> Result<SemanticAxis, ScoreError> {
    build_named(space, &definition.name, &definition.left, &definition.right)
}

/// Build an unnamed axis from two word lists: `mean(left) - mean(right)`.
pub fn build_axis(
    space: &dyn EmbeddingSpace,
    left: &[String],
    right: &[String],
) -> Result<SemanticAxis, ScoreError> {
    build_named(space, "", left, right)
}

fn build_named(
    space: &dyn EmbeddingSpace,
    name: &str,
    left: &[String],
    right: &[String],
) -> Result<SemanticAxis, ScoreError> {
    let mut missing = Vec::new();
    let (left_mean, left_used) = pole_mean(space, name, Pole::Left, left, &mut missing)?;
    let (right_mean, right_used) = pole_mean(space, name, Pole::Right, right, &mut missing)?;

    let vector: Vec<f32> = left_mean
        .iter()
        .zip(right_mean.iter())
        .map(|(l, r)| (l - r) as f32)
        .collect();

    debug!(
        axis = name,
        space = space.id(),
        left_used,
        right_used,
        missing = missing.len(),
        "Built semantic axis"
    );

    Ok(SemanticAxis {
        name: name.to_string(),
        space_id: space.id().to_string(),
        vector,
        left_used,
        right_used,
        missing,
    })
}

/// Mean vector of one pole's in-vocabulary words. Repeated words count once.
fn pole_mean(
    space: &dyn EmbeddingSpace,
    axis: &str,
    pole: Pole,
    words: &[String],
    missing: &mut Vec<String>,
) -> Result<(Vec<f64>, usize), ScoreError> {
    let mut seen = HashSet::new();
    let mut vectors = Vec::with_capacity(words.len());

    for word in words {
        if !seen.insert(word.as_str()) {
            continue;
        }
        match space.vector_of(word) {
            Some(v) => vectors.push(v),
            None => missing.push(word.clone()),
        }
    }

    let used = vectors.len();
    let mean = mean_vector(vectors, space.dim()).ok_or_else(|| ScoreError::EmptyPole {
        axis: axis.to_string(),
        pole,
        space: space.id().to_string(),
    })?;
    Ok((mean, used))
}
