// Projection of a term onto a semantic axis.
//
// The projection is the cosine similarity between the term's vector and the
// axis. It is signed: positive leans toward the left pole, negative toward
// the right. The ranking stages take the absolute value.

use crate::embedding::math::cosine_similarity;
use crate::embedding::EmbeddingSpace;
use crate::error::ScoreError;

use super::builder::SemanticAxis;

/// Project `word` onto `axis`, returning a value in [-1, 1].
pub fn project(
    space: &dyn EmbeddingSpace,
    word: &str,
    axis: &SemanticAxis,
) -> Result<f64, ScoreError> {
    if axis.dim() != space.dim() {
        return Err(ScoreError::DimensionMismatch {
            expected: space.dim(),
            got: axis.dim(),
        });
    }
    let vector = space.require(word)?;
    cosine_similarity(vector, &axis.vector)
}

/// Absolute projection, the "how politically loaded" magnitude.
pub fn loadedness(
    space: &dyn EmbeddingSpace,
    word: &str,
    axis: &SemanticAxis,
) -> Result<f64, ScoreError> {
    project(space, word, axis).map(f64::abs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::builder::build_axis;
    use crate::embedding::VectorTable;

    fn toy() -> VectorTable {
        VectorTable::from_entries(
            "toy",
            vec![
                ("left1", vec![1.0, 0.0]),
                ("right1", vec![-1.0, 0.0]),
                ("probe", vec![0.8, 0.6]),
                ("zero", vec![0.0, 0.0]),
            ],
        )
        .unwrap()
    }

    fn axis(space: &VectorTable) -> SemanticAxis {
        build_axis(space, &["left1".to_string()], &["right1".to_string()]).unwrap()
    }

    #[test]
    fn test_probe_projection() {
        let s = toy();
        let a = axis(&s);
        assert_eq!(a.vector, vec![2.0, 0.0]);
        let p = project(&s, "probe", &a).unwrap();
        assert!((p - 0.8).abs() < 1e-6, "Expected 0.8, got {p}");
    }

    #[test]
    fn test_right_leaning_is_negative() {
        let s = toy();
        let p = project(&s, "right1", &axis(&s)).unwrap();
        assert!((p + 1.0).abs() < 1e-9);
        assert!((loadedness(&s, "right1", &axis(&s)).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_word() {
        let s = toy();
        assert_eq!(
            project(&s, "missing", &axis(&s)),
            Err(ScoreError::OutOfVocabulary {
                term: "missing".to_string(),
                space: "toy".to_string(),
            })
        );
    }

    #[test]
    fn test_zero_vector_word_is_degenerate() {
        let s = toy();
        assert_eq!(
            project(&s, "zero", &axis(&s)),
            Err(ScoreError::DegenerateVector)
        );
    }

    #[test]
    fn test_axis_from_other_space_rejected() {
        let s = toy();
        let wide = VectorTable::from_entries(
            "wide",
            vec![("left1", vec![1.0, 0.0, 0.0]), ("right1", vec![0.0, 1.0, 0.0])],
        )
        .unwrap();
        let foreign = build_axis(&wide, &["left1".to_string()], &["right1".to_string()]).unwrap();
        assert_eq!(
            project(&s, "probe", &foreign),
            Err(ScoreError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        );
    }
}
