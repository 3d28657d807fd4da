use std::fs;
use tempfile::TempDir;

use passagedb_embed::get_default_embedder;
use passagedb_index::{Retriever, RetrieverOptions};

const FIRE: &str = "Starting a fire without matches takes patience and dry tinder. \
Gather birch bark, shave a feather stick, and strike sparks into the nest until it smokes.";

const WATER: &str = "--- Page 4 ---\nClear water is not always clean water. \
Boil it for a full minute, or filter through cloth and charcoal before drinking anything found downstream.";

#[test]
fn ingest_and_retrieve_full_flow() {
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let corpus = TempDir::new().expect("corpus");
    fs::write(corpus.path().join("firecraft_text.txt"), format!("{FIRE}\n")).expect("write");
    fs::write(corpus.path().join("water_text.txt"), format!("{WATER}\n")).expect("write");

    let index_dir = TempDir::new().expect("index");
    let embedder = get_default_embedder().expect("embedder");
    let mut retriever =
        Retriever::open(index_dir.path(), embedder, RetrieverOptions::default()).expect("open");

    let total = retriever.ingest_corpus(corpus.path()).expect("ingest");
    assert_eq!(total, 2);
    assert_eq!(retriever.len(), 2);

    // Querying with a passage's own text pins cosine similarity at ~1.
    let expected_text = FIRE;
    let results = retriever.retrieve(expected_text, 3).expect("retrieve");
    assert!(!results.is_empty());
    let top = &results[0];
    assert_eq!(top.source, "firecraft");
    assert_eq!(top.text, expected_text);
    assert!((top.relevance - 1.0).abs() < 1e-3);
    for r in &results {
        assert!(r.relevance > 0.3 && r.relevance <= 1.0 + 1e-6);
        assert!(!r.text.contains("--- Page"), "markers never reach stored passages");
    }
    for pair in results.windows(2) {
        assert!(pair[0].relevance >= pair[1].relevance, "descending order");
    }

    // A fresh engine over the snapshot answers identically.
    let embedder = get_default_embedder().expect("embedder");
    let reopened =
        Retriever::open(index_dir.path(), embedder, RetrieverOptions::default()).expect("reopen");
    let again = reopened.retrieve(expected_text, 3).expect("retrieve");
    assert_eq!(results.len(), again.len());
    for (a, b) in results.iter().zip(again.iter()) {
        assert_eq!(a.text, b.text);
        assert_eq!(a.source, b.source);
        assert!((a.relevance - b.relevance).abs() < 1e-6);
    }
}
