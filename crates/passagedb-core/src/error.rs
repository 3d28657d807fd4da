use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding has zero norm, cannot unit-normalize")]
    ZeroNormEmbedding,

    #[error("Incomplete snapshot: {0}")]
    SnapshotIncomplete(String),

    #[error("Corrupt snapshot: {0}")]
    SnapshotCorrupt(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
