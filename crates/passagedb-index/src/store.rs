//! Ordered passage storage, position-aligned with the vector index.

use passagedb_core::types::Passage;

#[derive(Debug, Default)]
pub struct DocumentStore {
    passages: Vec<Passage>,
}

impl DocumentStore {
    pub fn from_passages(passages: Vec<Passage>) -> Self {
        Self { passages }
    }

    pub fn push_all(&mut self, passages: impl IntoIterator<Item = Passage>) {
        self.passages.extend(passages);
    }

    pub fn get(&self, i: usize) -> Option<&Passage> {
        self.passages.get(i)
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }
}
