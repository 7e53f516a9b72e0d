//! Config-selected construction of providers and stores.
//!
//! Replaces ad hoc selection (commenting client variants in and out) with
//! one explicit resolution at startup.

use std::sync::Arc;

use tracing::info;

use vecsql_embeddings::{EmbeddingProvider, MockProvider, OpenAiProvider};
use vecsql_store::{MemoryVectorStore, SqliteVectorStore, VectorRecordStore};

use crate::config::{EngineConfig, ProviderKind, StoreKind};
use crate::error::Result;

/// Build the embedding provider named by the configuration.
pub fn build_provider(config: &EngineConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        ProviderKind::OpenAi => {
            let mut provider = OpenAiProvider::new();
            if let Some(key) = &config.api_key {
                provider = provider.with_api_key(key);
            }
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url);
            }
            if let Some(model) = &config.model {
                provider = provider.with_model(model);
            }
            Arc::new(provider)
        }
        ProviderKind::Mock => Arc::new(MockProvider::new(config.dimensions)),
    };

    info!("Using embedding provider '{}'", provider.name());
    Ok(provider)
}

/// Build the vector record store named by the configuration.
pub fn build_store(config: &EngineConfig) -> Result<Arc<dyn VectorRecordStore>> {
    let store: Arc<dyn VectorRecordStore> = match config.store {
        StoreKind::Sqlite => {
            info!("Using sqlite store at {}", config.db_path.display());
            Arc::new(SqliteVectorStore::new(&config.db_path, config.dimensions))
        }
        StoreKind::Memory => {
            info!("Using in-memory store");
            Arc::new(MemoryVectorStore::new(config.dimensions))
        }
    };
    Ok(store)
}
