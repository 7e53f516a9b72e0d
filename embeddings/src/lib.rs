//! # Embeddings
//!
//! This crate turns text into dense vectors for the vecsql store.
//!
//! Two providers are available:
//!
//! - [`OpenAiProvider`]: calls an OpenAI-compatible embeddings HTTP API
//!   (including Azure OpenAI deployments behind a custom base URL).
//! - [`MockProvider`]: produces offline vectors of the requested length,
//!   either uniform-random or a fixed vector for deterministic tests.
//!
//! Providers are selected explicitly by the caller; there is no runtime
//! detection. Every provider guarantees that a returned vector has exactly
//! the requested dimensionality or fails with
//! [`EmbeddingError::DimensionMismatch`].

pub mod error;
pub mod provider;

pub use error::{EmbeddingError, Result};
pub use provider::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, MockProvider, OpenAiProvider,
};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Default embedding dimension (OpenAI text-embedding-3-small).
pub const DEFAULT_DIMENSION: usize = 1536;
