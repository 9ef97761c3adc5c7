//! Error types for docchat

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for docchat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docchat operations
#[derive(Error, Debug)]
pub enum Error {
    /// The corpus directory is missing or cannot be read
    #[error("corpus access error at {path}: {reason}")]
    CorpusAccess { path: PathBuf, reason: String },

    /// A single file could not be decoded into documents
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// Tried to build an index from zero entries
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Failed to build or search the vector index
    #[error("index error: {0}")]
    Index(String),

    /// The chat-completion backend failed or was unreachable
    #[error("upstream model error: {0}")]
    Upstream(String),

    /// Settings could not be loaded or are inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure outside of per-file decoding
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
