// Unit tests for everything that touches the filesystem.
//
// Embedding files in each supported format, directory loading order, seed
// lists, labeled sets, axis definition files and CSV tables, all written
// into temporary directories.

use std::path::Path;

use polaxis::axis::definition::load_definitions;
use polaxis::calibration::{Label, LabeledTestSet};
use polaxis::embedding::loader::{is_supported, load_space, load_spaces_from_dir};
use polaxis::embedding::EmbeddingSpace;
use polaxis::output::csv::{read_table, write_table};
use polaxis::ranking::{RankedTable, ScoredTerm};
use polaxis::seeds::load_seeds;

fn write(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn encode_binary(rows: &[(&str, [f32; 2])]) -> Vec<u8> {
    let mut out = format!("{} 2\n", rows.len()).into_bytes();
    for (term, vector) in rows {
        out.extend_from_slice(term.as_bytes());
        out.push(b' ');
        for v in vector {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.push(b'\n');
    }
    out
}

// ============================================================
// Embedding files
// ============================================================

#[test]
fn loads_text_and_binary_formats() {
    let dir = tempfile::tempdir().unwrap();
    let txt = write(dir.path(), "glove.txt", b"vote 0.5 -1\nparty 1 1\n");
    let vec = write(dir.path(), "fasttext.vec", b"2 2\nvote 0.5 -1\nparty 1 1\n");
    let bin = write(
        dir.path(),
        "word2vec.bin",
        &encode_binary(&[("vote", [0.5, -1.0]), ("party", [1.0, 1.0])]),
    );

    for path in [&txt, &vec, &bin] {
        let space = load_space(path).unwrap();
        assert_eq!(space.len(), 2, "{}", path.display());
        assert_eq!(space.dim(), 2);
        assert_eq!(space.vector_of("vote"), Some(&[0.5_f32, -1.0][..]));
        assert_eq!(space.id(), path.file_name().unwrap().to_str().unwrap());
    }
}

#[test]
fn unsupported_and_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let model = write(dir.path(), "w2v.model", b"pickle");
    assert!(!is_supported(&model));
    assert!(load_space(&model).is_err());
    assert!(load_space(&dir.path().join("absent.txt")).is_err());
}

#[test]
fn directory_loads_in_filename_order_and_skips_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b_second.txt", b"x 1 0\n");
    write(dir.path(), "a_first.txt", b"x 0 1\n");
    write(dir.path(), "c_broken.txt", b"x 1 zero\n");
    write(dir.path(), "notes.md", b"# not vectors\n");

    let spaces = load_spaces_from_dir(dir.path()).unwrap();
    let ids: Vec<&str> = spaces.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec!["a_first.txt", "b_second.txt"]);
}

#[test]
fn corrupt_header_fails_that_file_only() {
    let dir = tempfile::tempdir().unwrap();
    let huge = format!("{} 2\na 1 0\n", usize::MAX);
    let bad_txt = write(dir.path(), "a_bad.txt", huge.as_bytes());
    let bad_bin = write(dir.path(), "a_bad.bin", huge.as_bytes());
    write(dir.path(), "b_good.txt", b"a 1 0\nb 0 1\n");

    assert!(load_space(&bad_txt).is_err());
    assert!(load_space(&bad_bin).is_err());

    let spaces = load_spaces_from_dir(dir.path()).unwrap();
    let ids: Vec<&str> = spaces.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec!["b_good.txt"]);
}

#[test]
fn empty_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_spaces_from_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("No loadable embedding files"));
}

// ============================================================
// Configuration files
// ============================================================

#[test]
fn seed_file_formats() {
    let dir = tempfile::tempdir().unwrap();
    let text = write(dir.path(), "seeds.txt", b"# core terms\nrace\ngender\n\nrace\n");
    assert_eq!(load_seeds(&text, "en").unwrap(), vec!["race", "gender"]);

    let json = write(
        dir.path(),
        "words.json",
        br#"[{"lemma": "ableism", "lemma_lang": "en"}, {"lemma": "Ableismus", "lemma_lang": "de"}]"#,
    );
    assert_eq!(load_seeds(&json, "de").unwrap(), vec!["Ableismus"]);
}

#[test]
fn labeled_set_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "labels.json", br#"{"tariff": 1, "teapot": 0}"#);
    let set = LabeledTestSet::load(&path).unwrap();
    let entries: Vec<(&str, Label)> = set.iter().collect();
    assert_eq!(
        entries,
        vec![("tariff", Label::Sensitive), ("teapot", Label::Neutral)]
    );

    let bad = write(dir.path(), "bad.json", br#"{"tariff": 0.5}"#);
    assert!(LabeledTestSet::load(&bad).is_err());
}

#[test]
fn definitions_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "dims.json",
        br#"{"economic": {"positive": ["welfare"], "negative": ["markets"]},
             "social": {"left": ["equality"], "right": ["tradition"]}}"#,
    );
    let defs = load_definitions(&path).unwrap();
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].name, "economic");
    assert_eq!(defs[0].left, vec!["welfare"]);
    assert_eq!(defs[1].right, vec!["tradition"]);
}

// ============================================================
// CSV tables
// ============================================================

#[test]
fn table_survives_write_and_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("joined.csv");

    let mut shared = ScoredTerm::new("quota, \"hard\"", 0.625, "equity");
    shared.source_terms.insert("affirmative action".to_string());
    let table: RankedTable = vec![shared, ScoredTerm::new("ballot", 0.125, "vote")]
        .into_iter()
        .collect();

    write_table(&path, &table).unwrap();
    let back = read_table(&path).unwrap();
    assert_eq!(back, table);
}

#[test]
fn legacy_csv_with_duplicate_terms_keeps_highest() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "output_buzzwords_approach.csv",
        b"similar_word,sensitivity_score,input_word\nmigrant,0.4,refugee\nmigrant,0.7,asylum\n",
    );
    let table = read_table(&path).unwrap();
    assert_eq!(table.len(), 1);
    let row = table.get("migrant").unwrap();
    assert_eq!(row.score, 0.7);
    assert_eq!(row.sources_joined(), "asylum");
}
