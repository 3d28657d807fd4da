//! Domain types shared by the retrieval engine and its callers.

use serde::{Deserialize, Serialize};

/// One indexed unit of text drawn from a corpus file.
///
/// - `text`: the passage content, whitespace-normalized
/// - `source`: attribution label for the originating file (file stem
///   with a trailing `_text` suffix removed)
///
/// Position-aligned with the vector index: the passage at ordinal `i`
/// was embedded into the vector at ordinal `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    pub source: String,
}

/// A passage returned to a caller, scored against the query.
///
/// `relevance` is the inner product of the unit-normalized query and
/// passage vectors, i.e. cosine similarity in [-1, 1]. Higher is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub text: String,
    pub source: String,
    pub relevance: f32,
}
