//! Error types for the vector record store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the vector record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Opening the underlying connection failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Expected tables are absent.
    #[error("schema not deployed; run the schema deployment first")]
    SchemaNotDeployed,

    /// A vector was malformed or had the wrong length.
    #[error("invalid vector: expected {expected} dimensions, got {got}")]
    InvalidVector { expected: usize, got: usize },

    /// A stored vector blob could not be decoded.
    #[error("malformed vector blob: {0} bytes")]
    MalformedVector(usize),

    /// SQL error.
    #[error("sql error: {0}")]
    Sql(#[from] rusqlite::Error),
}
