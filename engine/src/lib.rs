//! # Search engine facade
//!
//! Composes an embedding provider and a vector record store into the one
//! workflow the tools need: embed a batch of documents in parallel, upsert
//! them, embed a search phrase, and run a top-K nearest-neighbor query.
//!
//! Providers and stores are built once at startup from [`EngineConfig`] by
//! the [`factory`] module; nothing is selected by runtime detection, and no
//! global state is involved. Every component receives its dependencies
//! through construction.

pub mod config;
pub mod engine;
pub mod error;
pub mod factory;

pub use config::{EngineConfig, ProviderKind, StoreKind};
pub use engine::SearchEngine;
pub use error::{EngineError, Result};
pub use factory::{build_provider, build_store};
