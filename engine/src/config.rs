//! Engine configuration.
//!
//! All selection between real and mock components happens here, resolved
//! once at startup from environment-style key/value configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use vecsql_embeddings::DEFAULT_DIMENSION;

use crate::error::{EngineError, Result};

/// Which embedding provider to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI-compatible embeddings API.
    #[default]
    OpenAi,
    /// Offline random vectors; tests and demos only.
    Mock,
}

/// Which store backend to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// SQLite + sqlite-vec database file.
    #[default]
    Sqlite,
    /// In-process map; nothing persists.
    Memory,
}

/// Configuration for the search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Embedding provider selection.
    pub provider: ProviderKind,

    /// Store backend selection.
    pub store: StoreKind,

    /// Database file path (SQLite backend).
    pub db_path: PathBuf,

    /// Expected embedding dimensionality.
    pub dimensions: usize,

    /// Model or deployment name passed to the provider.
    pub model: Option<String>,

    /// API key for the real provider.
    pub api_key: Option<String>,

    /// Base URL override for the real provider (Azure deployments etc.).
    pub base_url: Option<String>,

    /// Collection that documents are written to and queried from.
    pub collection: String,
}

impl EngineConfig {
    /// Create a configuration with defaults for the given database path.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            provider: ProviderKind::default(),
            store: StoreKind::default(),
            db_path: db_path.into(),
            dimensions: DEFAULT_DIMENSION,
            model: None,
            api_key: None,
            base_url: None,
            collection: "default".to_string(),
        }
    }

    /// Select the embedding provider.
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    /// Select the store backend.
    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.store = store;
        self
    }

    /// Set the embedding dimensionality.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the target collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Load configuration from process environment variables.
    ///
    /// A missing required value is a fatal [`EngineError::Configuration`];
    /// callers are expected to exit early with the message.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an injectable lookup (testable variant of
    /// [`EngineConfig::from_env`]).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match lookup("VECSQL_PROVIDER").as_deref() {
            None | Some("openai") => ProviderKind::OpenAi,
            Some("mock") => ProviderKind::Mock,
            Some(other) => {
                return Err(EngineError::Configuration(format!(
                    "VECSQL_PROVIDER must be 'openai' or 'mock', got '{other}'"
                )));
            }
        };

        let store = match lookup("VECSQL_STORE").as_deref() {
            None | Some("sqlite") => StoreKind::Sqlite,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(EngineError::Configuration(format!(
                    "VECSQL_STORE must be 'sqlite' or 'memory', got '{other}'"
                )));
            }
        };

        let db_path = match lookup("VECSQL_DB") {
            Some(path) => PathBuf::from(path),
            None if store == StoreKind::Sqlite => {
                return Err(EngineError::Configuration(
                    "VECSQL_DB is not set; point it at the database file".to_string(),
                ));
            }
            None => PathBuf::new(),
        };

        let api_key = lookup("OPENAI_KEY");
        if provider == ProviderKind::OpenAi && api_key.is_none() {
            return Err(EngineError::Configuration(
                "OPENAI_KEY is not set; required for the openai provider".to_string(),
            ));
        }

        let dimensions = match lookup("EMBEDDING_DIMENSIONS") {
            Some(raw) => raw.parse().map_err(|_| {
                EngineError::Configuration(format!(
                    "EMBEDDING_DIMENSIONS must be a positive integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_DIMENSION,
        };

        Ok(Self {
            provider,
            store,
            db_path,
            dimensions,
            model: lookup("OPENAI_DEPLOYMENT_NAME"),
            api_key,
            base_url: lookup("OPENAI_URL"),
            collection: lookup("VECSQL_COLLECTION").unwrap_or_else(|| "default".to_string()),
        })
    }
}
