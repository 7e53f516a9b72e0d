//! # Vector record store
//!
//! This crate persists (key, text, vector) records in a relational engine
//! and answers top-K nearest-neighbor queries by delegating the distance
//! computation to the engine's vector-distance SQL functions.
//!
//! ## Backends
//!
//! - [`SqliteVectorStore`]: SQLite with the sqlite-vec extension. Vectors
//!   live in float32 blob columns; `vec_distance_cosine` / `vec_distance_l2`
//!   run inside the engine. The reference backend.
//! - [`MemoryVectorStore`]: in-process map, distance computed locally.
//!   Interchangeable behind [`VectorRecordStore`] for tests and offline use.
//!
//! Every operation opens and releases its own connection; no shared mutable
//! state survives between calls.

pub mod distance;
pub mod error;
pub mod memory;
pub mod record;
pub mod sqlite;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryVectorStore;
pub use record::{
    CollectionId, DistanceMetric, DocumentInput, RecordId, SearchResult, StoredDocument,
};
pub use sqlite::SqliteVectorStore;
pub use store::VectorRecordStore;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
