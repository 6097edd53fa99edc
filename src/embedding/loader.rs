// Vector file loading: word2vec text, GloVe text and word2vec binary.
//
// Text format: optional "<count> <dim>" header line, then one
// "<term> <v1> <v2> ..." row per line (GloVe files simply omit the header).
// Binary format: "<count> <dim>\n" header, then for each row the term bytes,
// a single space, and <dim> little-endian f32 values, optionally followed by
// a newline.
//
// A space's id is its file name, so calibration results name the file that
// won.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::table::VectorTable;
use super::traits::EmbeddingSpace;

/// File extensions the loader understands.
const TEXT_EXTENSIONS: &[&str] = &["txt", "vec"];
const BINARY_EXTENSIONS: &[&str] = &["bin"];

/// Header values above these are treated as a corrupt file, not a real model.
const MAX_VECTORS: usize = 1 << 28;
const MAX_DIM: usize = 1 << 16;

/// Headers are hints; never preallocate more rows than this up front.
const RESERVE_LIMIT: usize = 1 << 20;

/// Whether a path looks like a vector file we can load.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            TEXT_EXTENSIONS.contains(&ext.as_str()) || BINARY_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Load a single vector file, choosing the parser from its extension.
pub fn load_space(path: &Path) -> Result<VectorTable> {
    if !path.exists() {
        anyhow::bail!("Embedding file not found: {}", path.display());
    }

    let id = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let parsed = if BINARY_EXTENSIONS.contains(&ext.as_str()) {
        read_binary(&id, reader)
    } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        read_text(&id, reader)
    } else {
        anyhow::bail!(
            "Unsupported embedding file {} (expected .txt, .vec or .bin)",
            path.display()
        );
    };
    let table =
        parsed.with_context(|| format!("Failed to parse embedding file {}", path.display()))?;

    info!(
        space = %id,
        terms = table.len(),
        dim = table.dim(),
        "Loaded embedding space"
    );
    Ok(table)
}

/// Load every supported vector file in `dir`, ordered by file name.
///
/// The order matters: calibration ties go to the earliest space, so a
/// directory listing (which is unordered) must be sorted first. Files that
/// fail to parse are skipped with a warning rather than aborting the batch.
pub fn load_spaces_from_dir(dir: &Path) -> Result<Vec<VectorTable>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read models directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_supported(p))
        .collect();
    paths.sort();

    let mut spaces = Vec::with_capacity(paths.len());
    for path in &paths {
        match load_space(path) {
            Ok(space) => spaces.push(space),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable embedding file"),
        }
    }

    if spaces.is_empty() {
        anyhow::bail!(
            "No loadable embedding files (.txt, .vec, .bin) in {}",
            dir.display()
        );
    }
    Ok(spaces)
}

/// Parse the text format from any reader.
pub fn read_text<R: BufRead>(id: &str, reader: R) -> Result<VectorTable> {
    let mut table: Option<VectorTable> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(term) = parts.next() else {
            continue;
        };
        let values: Vec<&str> = parts.collect();

        // A "<count> <dim>" header is only legal as the first line
        if line_no == 0 && values.len() == 1 && is_header(term, values[0]) {
            let count: usize = term.parse().unwrap_or(0);
            let dim: usize = values[0].parse().unwrap_or(0);
            check_header(count, dim)?;
            let mut t = VectorTable::new(id, dim);
            t.reserve(count.min(RESERVE_LIMIT));
            table = Some(t);
            debug!(count, dim, "Read text header");
            continue;
        }

        let vector = values
            .iter()
            .map(|v| v.parse::<f32>())
            .collect::<std::result::Result<Vec<f32>, _>>()
            .with_context(|| format!("Non-numeric vector component on line {}", line_no + 1))?;

        let table = table.get_or_insert_with(|| VectorTable::new(id, vector.len()));
        table
            .insert(term, &vector)
            .with_context(|| format!("Line {}", line_no + 1))?;
    }

    table.ok_or_else(|| anyhow::anyhow!("File contains no vectors"))
}

fn check_header(count: usize, dim: usize) -> Result<()> {
    if count > MAX_VECTORS {
        anyhow::bail!("Header declares {count} vectors, more than the supported {MAX_VECTORS}");
    }
    if dim == 0 || dim > MAX_DIM {
        anyhow::bail!("Header declares vector width {dim}, expected 1 to {MAX_DIM}");
    }
    Ok(())
}

fn is_header(first: &str, second: &str) -> bool {
    first.parse::<usize>().is_ok() && second.parse::<usize>().is_ok()
}

/// Parse the word2vec binary format from any reader.
pub fn read_binary<R: BufRead>(id: &str, mut reader: R) -> Result<VectorTable> {
    let mut header = String::new();
    reader
        .read_line(&mut header)
        .context("Failed to read binary header")?;
    let mut fields = header.split_whitespace();
    let count: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .context("Binary header is missing the vector count")?;
    let dim: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .context("Binary header is missing the vector width")?;

    check_header(count, dim)?;

    let mut table = VectorTable::new(id, dim);
    table.reserve(count.min(RESERVE_LIMIT));

    let width = dim
        .checked_mul(4)
        .context("Binary header vector width overflows")?;
    let mut buf = vec![0u8; width];
    let mut vector = vec![0f32; dim];

    for row in 0..count {
        let term = read_term(&mut reader)
            .with_context(|| format!("Failed to read term {} of {}", row + 1, count))?;
        reader
            .read_exact(&mut buf)
            .with_context(|| format!("Truncated vector for '{term}'"))?;
        for (slot, chunk) in vector.iter_mut().zip(buf.chunks_exact(4)) {
            *slot = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        table.insert(term, &vector)?;
    }

    Ok(table)
}

/// Read bytes up to the separating space, skipping the newline that some
/// writers put after each vector.
fn read_term<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_until(b' ', &mut bytes)?;
    if bytes.last() == Some(&b' ') {
        bytes.pop();
    } else {
        anyhow::bail!("Unexpected end of file");
    }
    while bytes.first() == Some(&b'\n') {
        bytes.remove(0);
    }
    if bytes.is_empty() {
        anyhow::bail!("Empty term");
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
