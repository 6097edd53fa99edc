// Calibration: pick the (space, axis definition) pair that best reproduces
// the labeled set.
//
// For each pair we build the axis, project every labeled term the space
// knows, and average |abs(projection) - label| over those terms. The pair
// with the lowest mean error wins. Ties keep the pair met first when walking
// spaces in order and, within a space, definitions in order, so input order
// is part of the result.
//
// Pairs are independent. With the `parallel` feature the grid is evaluated
// on rayon, but results are collected in grid order and reduced by the same
// sequential scan, so the tie-break never depends on thread timing.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::axis::{build_axis_for, project, AxisDefinition};
use crate::embedding::EmbeddingSpace;
use crate::error::ScoreError;

use super::labeled::LabeledTestSet;

/// What happened when one (space, definition) pair was evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    /// The pair produced a mean error over `evaluated` labeled terms.
    Scored { mean_error: f64, evaluated: usize },
    /// The axis couldn't be built (a pole had no known words).
    EmptyPole(ScoreError),
    /// The axis was built but none of the labeled terms could be scored.
    NoTerms,
}

/// Diagnostics for one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PairEvaluation {
    pub space_index: usize,
    pub axis_index: usize,
    pub space_id: String,
    pub axis_name: String,
    pub outcome: PairOutcome,
    /// Labeled terms skipped because the space didn't know them
    pub missing_terms: Vec<String>,
}

impl PairEvaluation {
    pub fn mean_error(&self) -> Option<f64> {
        match self.outcome {
            PairOutcome::Scored { mean_error, .. } => Some(mean_error),
            _ => None,
        }
    }
}

/// The winning pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub space_id: String,
    pub axis_name: String,
    pub mean_error: f64,
    pub evaluated_terms: usize,
    /// Position of the winning space in the input
    pub space_index: usize,
    /// Position of the winning definition in the input
    pub axis_index: usize,
}

/// Evaluate one (space, definition) pair against the labeled set.
pub fn evaluate_pair(
    space: &dyn EmbeddingSpace,
    space_index: usize,
    definition: &AxisDefinition,
    axis_index: usize,
    labeled: &LabeledTestSet,
) -> PairEvaluation {
    let mut evaluation = PairEvaluation {
        space_index,
        axis_index,
        space_id: space.id().to_string(),
        axis_name: definition.name.clone(),
        outcome: PairOutcome::NoTerms,
        missing_terms: Vec::new(),
    };

    let axis = match build_axis_for(space, definition) {
        Ok(axis) => axis,
        Err(e) => {
            warn!(space = space.id(), axis = %definition.name, error = %e, "Skipping axis");
            evaluation.outcome = PairOutcome::EmptyPole(e);
            return evaluation;
        }
    };

    let mut total_error = 0.0;
    let mut evaluated = 0usize;

    for (term, label) in labeled.iter() {
        match project(space, term, &axis) {
            Ok(projection) => {
                total_error += (projection.abs() - label.target()).abs();
                evaluated += 1;
            }
            Err(e) if e.is_recoverable() => {
                debug!(
                    term,
                    space = space.id(),
                    axis = %definition.name,
                    error = %e,
                    "Labeled term skipped"
                );
                evaluation.missing_terms.push(term.to_string());
            }
            Err(e) => {
                // The axis itself is unusable (e.g. zero-length); no term can score
                warn!(space = space.id(), axis = %definition.name, error = %e, "Axis unusable");
                evaluation.missing_terms.push(term.to_string());
            }
        }
    }

    if evaluated > 0 {
        let mean_error = total_error / evaluated as f64;
        if mean_error.is_finite() {
            evaluation.outcome = PairOutcome::Scored {
                mean_error,
                evaluated,
            };
        } else {
            warn!(space = space.id(), axis = %definition.name, "Non-finite mean error, pair excluded");
        }
    }

    evaluation
}

/// Evaluate every (space, definition) pair, in grid order.
pub fn evaluate_grid<S: EmbeddingSpace>(
    spaces: &[S],
    definitions: &[AxisDefinition],
    labeled: &LabeledTestSet,
) -> Vec<PairEvaluation> {
    let cells: Vec<(usize, usize)> = (0..spaces.len())
        .flat_map(|s| (0..definitions.len()).map(move |d| (s, d)))
        .collect();

    let evaluate =
        |&(s, d): &(usize, usize)| evaluate_pair(&spaces[s], s, &definitions[d], d, labeled);

    // collect() on an indexed parallel iterator preserves input order
    #[cfg(feature = "parallel")]
    let evaluations: Vec<PairEvaluation> = {
        use rayon::prelude::*;
        cells.par_iter().map(evaluate).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let evaluations: Vec<PairEvaluation> = cells.iter().map(evaluate).collect();

    evaluations
}

/// Reduce evaluations to the best pair: strictly lower error wins, ties keep
/// the earlier evaluation.
pub fn pick_best(evaluations: &[PairEvaluation]) -> Result<CalibrationResult, ScoreError> {
    let mut best: Option<(&PairEvaluation, f64, usize)> = None;

    for evaluation in evaluations {
        let PairOutcome::Scored {
            mean_error,
            evaluated,
        } = evaluation.outcome
        else {
            continue;
        };
        let improves = match best {
            Some((_, best_error, _)) => mean_error < best_error,
            None => true,
        };
        if improves {
            best = Some((evaluation, mean_error, evaluated));
        }
    }

    let (winner, mean_error, evaluated_terms) = best.ok_or(ScoreError::NoCandidate)?;
    Ok(CalibrationResult {
        space_id: winner.space_id.clone(),
        axis_name: winner.axis_name.clone(),
        mean_error,
        evaluated_terms,
        space_index: winner.space_index,
        axis_index: winner.axis_index,
    })
}

/// Grid-search spaces × definitions and return the lowest-error pair.
pub fn select_best<S: EmbeddingSpace>(
    spaces: &[S],
    definitions: &[AxisDefinition],
    labeled: &LabeledTestSet,
) -> Result<CalibrationResult, ScoreError> {
    let evaluations = evaluate_grid(spaces, definitions, labeled);
    let result = pick_best(&evaluations)?;
    info!(
        space = %result.space_id,
        axis = %result.axis_name,
        mean_error = result.mean_error,
        pairs = evaluations.len(),
        "Calibration complete"
    );
    Ok(result)
}
