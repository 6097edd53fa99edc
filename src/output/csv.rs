// CSV export and import of ranked tables.
//
// Columns are `term,score,source_terms`, with source terms joined by ", "
// inside one quoted cell. Older exports used `similar_word`,
// `sensitivity_score` and `input_word`; those headers are read too, so a
// previous run's output can be merged with a fresh one.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ranking::{RankedTable, ScoredTerm};

pub const HEADER: [&str; 3] = ["term", "score", "source_terms"];

const TERM_COLUMNS: &[&str] = &["term", "similar_word"];
const SCORE_COLUMNS: &[&str] = &["score", "sensitivity_score"];
const SOURCE_COLUMNS: &[&str] = &["source_terms", "input_word"];

/// Quote a field if it contains a delimiter, quote, or line break.
fn escape_field(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render a table as CSV text, rows in table order.
pub fn to_csv_string(table: &RankedTable) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');
    for row in table.rows() {
        out.push_str(&escape_field(&row.term));
        out.push(',');
        out.push_str(&row.score.to_string());
        out.push(',');
        out.push_str(&escape_field(&row.sources_joined()));
        out.push('\n');
    }
    out
}

/// Write a table to `path`, creating the parent directory if needed.
pub fn write_table(path: &Path, table: &RankedTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for {}", path.display()))?;
        }
    }
    std::fs::write(path, to_csv_string(table))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "Wrote table");
    Ok(())
}

/// Split CSV text into records. Quoted fields may hold commas, doubled
/// quotes and line breaks. Blank lines are dropped.
fn parse_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                if !(record.len() == 1 && record[0].is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        anyhow::bail!("Unterminated quoted field");
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

fn column(header: &[String], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// Parse CSV text into a table. Repeated terms keep their highest score.
pub fn parse_table(text: &str) -> Result<RankedTable> {
    // Spreadsheet exports sometimes lead with a byte-order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = parse_records(text)?.into_iter();
    let header = records.next().context("CSV is empty")?;

    let term_col = column(&header, TERM_COLUMNS).context("CSV has no `term` column")?;
    let score_col = column(&header, SCORE_COLUMNS).context("CSV has no `score` column")?;
    let source_col = column(&header, SOURCE_COLUMNS);

    let mut table = RankedTable::new();
    for (i, record) in records.enumerate() {
        let line = i + 2;
        let term = record
            .get(term_col)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .with_context(|| format!("Row {line} has no term"))?;
        let raw_score = record
            .get(score_col)
            .with_context(|| format!("Row {line} has no score"))?;
        let score: f64 = raw_score
            .trim()
            .parse()
            .with_context(|| format!("Row {line} has an invalid score '{raw_score}'"))?;

        let source_terms: BTreeSet<String> = source_col
            .and_then(|c| record.get(c))
            .map(|cell| {
                cell.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let row = ScoredTerm {
            term: term.to_string(),
            score,
            source_terms,
        };
        if !row.score.is_finite() {
            warn!(line, term, "Skipping row with non-finite score");
            continue;
        }
        table.insert_max(row);
    }
    Ok(table)
}

pub fn read_table(path: &Path) -> Result<RankedTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table = parse_table(&text).with_context(|| format!("Invalid table in {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "Read table");
    Ok(table)
}
