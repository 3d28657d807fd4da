//! Corpus text processing: page-marker cleanup, whitespace
//! normalization, blank-line chunking, and corpus file discovery.
//!
//! Chunking runs on text that still has its original line structure;
//! only page markers are stripped beforehand. Collapsing whitespace
//! first would merge every paragraph break and turn a whole file into
//! one chunk.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--- Page \d+ ---").expect("static pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

/// Remove page markers, collapse whitespace runs (including newlines)
/// to single spaces, and trim. Idempotent; never fails.
pub fn normalize(raw: &str) -> String {
    let stripped = PAGE_MARKER.replace_all(raw, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Remove page markers only, preserving line structure. This is the
/// form chunking operates on.
pub fn strip_page_markers(raw: &str) -> String {
    PAGE_MARKER.replace_all(raw, "").into_owned()
}

/// Split `text` into passage-sized chunks along blank-line boundaries.
///
/// Consecutive non-blank lines are trimmed and joined with single
/// spaces. A buffer flushed by a blank line is emitted only if it is at
/// least `min_len` characters; shorter buffers are discarded. The
/// trailing buffer at end of input is always emitted, even if short.
/// Output order is input order and no chunk is empty.
pub fn chunk(text: &str, min_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                let joined = current.join(" ");
                if joined.len() >= min_len {
                    chunks.push(joined);
                }
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Attribution label for a corpus file: file stem with a trailing
/// `_text` suffix removed (`foo_text.txt` -> `foo`).
pub fn source_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.strip_suffix("_text").unwrap_or(&stem).to_string()
}

/// Sorted recursive listing of `.txt` files under `root`. Non-text
/// files are ignored. A missing or unreadable directory is an error,
/// not an empty corpus.
pub fn list_txt_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root) {
        let entry =
            entry.with_context(|| format!("reading corpus dir {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            txt_files.push(path.to_path_buf());
        }
    }
    txt_files.sort();
    Ok(txt_files)
}

/// Read a corpus file, falling back to lossy UTF-8 for files with
/// stray bytes.
pub fn read_file_content(file_path: &Path) -> Result<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
    }
}
