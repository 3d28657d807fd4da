use std::fs;
use std::path::Path;
use tempfile::TempDir;

use passagedb_core::corpus::{
    chunk, list_txt_files, normalize, source_name, strip_page_markers,
};

#[test]
fn normalize_strips_markers_and_collapses_whitespace() {
    let raw = "--- Page 1 ---\nIn the beginning\t\twas   the word.\n\n--- Page 2 ---\nAnd more.";
    let got = normalize(raw);
    assert_eq!(got, "In the beginning was the word. And more.");
}

#[test]
fn normalize_is_idempotent() {
    let inputs = [
        "",
        "   ",
        "plain text",
        "--- Page 12 ---\n  spaced\u{a0}? no, tabs\t\tand\nnewlines  ",
    ];
    for raw in inputs {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once, "idempotent for {raw:?}");
    }
}

#[test]
fn strip_page_markers_preserves_line_structure() {
    let raw = "first line\n--- Page 3 ---\nsecond line\n\nthird line";
    let got = strip_page_markers(raw);
    assert!(got.contains('\n'), "newlines survive");
    assert!(!got.contains("--- Page"), "markers removed");
}

#[test]
fn chunk_splits_on_blank_lines_and_enforces_min_len() {
    let long_a = "alpha ".repeat(30); // well above min_len
    let long_b = "bravo ".repeat(30);
    let text = format!("{long_a}\n\ntoo short\n\n{long_b}");
    let chunks = chunk(&text, 100);
    assert_eq!(chunks.len(), 2, "mid-stream short buffer is discarded");
    for c in &chunks {
        assert!(c.len() >= 100, "emitted chunks meet the minimum length");
        assert!(!c.contains('\n'), "lines joined with single spaces");
    }
}

#[test]
fn chunk_always_emits_trailing_buffer() {
    let chunks = chunk("just a short tail", 100);
    assert_eq!(chunks, vec!["just a short tail".to_string()]);
}

#[test]
fn chunk_joins_consecutive_lines_with_spaces() {
    let chunks = chunk("one\ntwo\nthree", 0);
    assert_eq!(chunks, vec!["one two three".to_string()]);
}

#[test]
fn chunk_of_blank_only_input_is_empty() {
    assert!(chunk("\n\n   \n\n", 10).is_empty());
    assert!(chunk("", 10).is_empty());
}

#[test]
fn source_name_strips_known_suffix() {
    assert_eq!(source_name(Path::new("/corpus/gita_text.txt")), "gita");
    assert_eq!(source_name(Path::new("notes.txt")), "notes");
}

#[test]
fn list_txt_files_is_sorted_and_ignores_other_extensions() {
    let tmp = TempDir::new().expect("tmp");
    let dir = tmp.path();
    fs::write(dir.join("b.txt"), "b").expect("write");
    fs::write(dir.join("a.txt"), "a").expect("write");
    fs::write(dir.join("c.bin"), [0u8, 1]).expect("write");

    let files = list_txt_files(dir).expect("list");
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("a.txt"));
    assert!(files[1].ends_with("b.txt"));
}

#[test]
fn list_txt_files_fails_on_missing_directory() {
    let tmp = TempDir::new().expect("tmp");
    let missing = tmp.path().join("no_such_dir");
    assert!(list_txt_files(&missing).is_err(), "unreadable corpus dir is not empty");
}
