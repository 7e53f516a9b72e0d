//! Error types for the search engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the search engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Embedding generation failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] vecsql_embeddings::EmbeddingError),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] vecsql_store::StoreError),

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),
}
