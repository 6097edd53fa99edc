// Unit tests for axis construction and projection.
//
// Covers the algebra of semantic axes (antisymmetry, boundedness), the
// vocabulary edge cases (unknown words, empty poles), and the accepted
// shapes of axis definition files.

use polaxis::axis::builtin::political_dimensions;
use polaxis::axis::definition::parse_definitions;
use polaxis::axis::{build_axis, build_axis_for, loadedness, project, AxisDefinition};
use polaxis::embedding::{EmbeddingSpace, VectorTable};
use polaxis::error::{Pole, ScoreError};
use serde_json::json;

fn words(ws: &[&str]) -> Vec<String> {
    ws.iter().map(|w| w.to_string()).collect()
}

/// Deterministic pseudo-random 4-dimensional space of `n` terms.
fn lcg_space(n: usize) -> VectorTable {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((state >> 33) as f64 / (1u64 << 31) as f64 * 2.0 - 1.0) as f32
    };
    let entries: Vec<(String, Vec<f32>)> = (0..n)
        .map(|i| (format!("w{i}"), (0..4).map(|_| next()).collect()))
        .collect();
    VectorTable::from_entries("lcg", entries).unwrap()
}

fn toy() -> VectorTable {
    VectorTable::from_entries(
        "toy",
        vec![
            ("left1", vec![1.0, 0.0]),
            ("right1", vec![-1.0, 0.0]),
            ("probe", vec![0.8, 0.6]),
        ],
    )
    .unwrap()
}

// ============================================================
// Axis algebra
// ============================================================

#[test]
fn axis_is_antisymmetric() {
    let space = lcg_space(40);
    let cases = [
        (words(&["w0", "w1", "w2"]), words(&["w3", "w4"])),
        (words(&["w5"]), words(&["w6", "w7", "w8", "w9"])),
        (words(&["w10", "missing"]), words(&["w11", "w12"])),
    ];
    for (l, r) in &cases {
        let forward = build_axis(&space, l, r).unwrap();
        let backward = build_axis(&space, r, l).unwrap();
        for (a, b) in forward.vector.iter().zip(&backward.vector) {
            assert!((a + b).abs() < 1e-6, "Expected {a} == -{b}");
        }
    }
}

#[test]
fn reversed_definition_flips_projection_sign() {
    let space = lcg_space(30);
    let def = AxisDefinition::new("d", ["w0", "w1"], ["w2", "w3"]);
    let forward = build_axis_for(&space, &def).unwrap();
    let backward = build_axis_for(&space, &def.reversed()).unwrap();
    for i in 4..30 {
        let term = format!("w{i}");
        let p = project(&space, &term, &forward).unwrap();
        let q = project(&space, &term, &backward).unwrap();
        assert!((p + q).abs() < 1e-6);
    }
}

#[test]
fn projection_is_bounded() {
    let space = lcg_space(200);
    let axis = build_axis(&space, &words(&["w0", "w1", "w2"]), &words(&["w3", "w4", "w5"])).unwrap();
    for i in 0..200 {
        let p = project(&space, &format!("w{i}"), &axis).unwrap();
        assert!((-1.0..=1.0).contains(&p), "Projection {p} out of bounds");
        let l = loadedness(&space, &format!("w{i}"), &axis).unwrap();
        assert!((0.0..=1.0).contains(&l));
    }
}

#[test]
fn pole_words_project_toward_their_pole() {
    let space = toy();
    let axis = build_axis(&space, &words(&["left1"]), &words(&["right1"])).unwrap();
    assert!(project(&space, "left1", &axis).unwrap() > 0.99);
    assert!(project(&space, "right1", &axis).unwrap() < -0.99);
}

// ============================================================
// Worked example from a two-dimensional space
// ============================================================

#[test]
fn toy_axis_and_probe() {
    let space = toy();
    let axis = build_axis(&space, &words(&["left1"]), &words(&["right1"])).unwrap();
    assert_eq!(axis.vector, vec![2.0, 0.0]);
    let p = project(&space, "probe", &axis).unwrap();
    assert!((p - 0.8).abs() < 1e-6);
}

// ============================================================
// Vocabulary edge cases
// ============================================================

#[test]
fn unknown_word_is_out_of_vocabulary() {
    let space = toy();
    let axis = build_axis(&space, &words(&["left1"]), &words(&["right1"])).unwrap();
    let err = project(&space, "zeitgeist", &axis).unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(
        err,
        ScoreError::OutOfVocabulary {
            term: "zeitgeist".to_string(),
            space: "toy".to_string()
        }
    );
}

#[test]
fn empty_left_pole_is_reported() {
    let space = toy();
    let err = build_axis(&space, &words(&["nope"]), &words(&["right1"])).unwrap_err();
    assert!(matches!(err, ScoreError::EmptyPole { pole: Pole::Left, .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn empty_word_list_is_an_empty_pole() {
    let space = toy();
    let err = build_axis(&space, &words(&["left1"]), &[]).unwrap_err();
    assert!(matches!(err, ScoreError::EmptyPole { pole: Pole::Right, .. }));
}

#[test]
fn builtin_dimensions_are_complete() {
    let dims = political_dimensions();
    let names: Vec<&str> = dims.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["economic", "social", "environment", "foreign", "governance"]);
    assert!(dims.iter().all(|d| !d.left.is_empty() && !d.right.is_empty()));
}

// ============================================================
// Definition file shapes
// ============================================================

#[test]
fn named_object_keeps_file_order() {
    let defs = parse_definitions(json!({
        "zeta": {"left": ["a"], "right": ["b"]},
        "alpha": {"positive": ["c"], "negative": ["d"]}
    }))
    .unwrap();
    let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
    assert_eq!(defs[1].left, vec!["c"]);
    assert_eq!(defs[1].right, vec!["d"]);
}

#[test]
fn array_entries_get_default_names() {
    let defs = parse_definitions(json!([
        {"left": ["a"], "right": ["b"]},
        {"name": "custom", "left": ["c"], "right": ["d"]}
    ]))
    .unwrap();
    assert_eq!(defs[0].name, "axis-1");
    assert_eq!(defs[1].name, "custom");
}

#[test]
fn single_bare_definition() {
    let defs = parse_definitions(json!({"positive": ["a"], "negative": ["b"]})).unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].left, vec!["a"]);
}

#[test]
fn malformed_definitions_rejected() {
    assert!(parse_definitions(json!("economic")).is_err());
    assert!(parse_definitions(json!([])).is_err());
    assert!(parse_definitions(json!({"economic": {"left": "a"}})).is_err());
}

#[test]
fn axis_only_fits_its_own_space() {
    let narrow = toy();
    let wide = lcg_space(10);
    let axis = build_axis(&wide, &words(&["w0"]), &words(&["w1"])).unwrap();
    assert_eq!(axis.space_id, wide.id());
    assert!(matches!(
        project(&narrow, "probe", &axis),
        Err(ScoreError::DimensionMismatch { expected: 2, got: 4 })
    ));
}
