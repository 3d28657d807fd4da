pub mod engine;
pub mod flat;
pub mod snapshot;
pub mod store;

pub use engine::{Retriever, RetrieverOptions};
pub use flat::FlatIndex;
pub use store::DocumentStore;
