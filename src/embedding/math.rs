// Vector arithmetic shared by axis construction, projection and buzzword scoring.
//
// Vectors are stored as f32 to keep large vocabularies affordable, but every
// reduction accumulates in f64 so means and dot products over a few hundred
// dimensions don't drift.

use crate::error::ScoreError;

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum()
}

/// Euclidean norm.
pub fn norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| x as f64 * x as f64).sum::<f64>().sqrt()
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Unlike a display-oriented similarity, this keeps the sign: an axis
/// projection needs to know which pole a word leans toward even if the
/// rankers later throw that away. A zero-norm operand has no direction and
/// is reported as `DegenerateVector` rather than silently mapped to 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, ScoreError> {
    if a.len() != b.len() {
        return Err(ScoreError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }

    let denom = norm(a) * norm(b);
    if denom == 0.0 || !denom.is_finite() {
        return Err(ScoreError::DegenerateVector);
    }

    let sim = dot(a, b) / denom;
    if !sim.is_finite() {
        return Err(ScoreError::DegenerateVector);
    }
    // Rounding can push |sim| a hair past 1.0 for parallel vectors
    Ok(sim.clamp(-1.0, 1.0))
}

/// Elementwise mean of a set of vectors, or `None` if the set is empty.
///
/// All vectors must share `dim`; the caller guarantees this by drawing them
/// from one space.
pub fn mean_vector<'a, I>(vectors: I, dim: usize) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut sum = vec![0.0_f64; dim];
    let mut count = 0usize;

    for v in vectors {
        for (acc, &x) in sum.iter_mut().zip(v.iter()) {
            *acc += x as f64;
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    for val in &mut sum {
        *val /= n;
    }
    Some(sum)
}
