//! Ingest and search orchestration.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info};

use vecsql_embeddings::{Embedding, EmbeddingProvider, EmbeddingRequest};
use vecsql_store::{DistanceMetric, DocumentInput, RecordId, SearchResult, VectorRecordStore};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::factory::{build_provider, build_store};

/// Facade over an embedding provider and a vector record store.
///
/// Embedding calls for a batch are independent of each other, so they are
/// fired concurrently and awaited together; each result lands in its own
/// record, so no coordination beyond the join is needed. Store writes stay
/// sequential. Failures propagate immediately; there is no retry policy.
pub struct SearchEngine {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorRecordStore>,
    dimensions: usize,
    model: Option<String>,
    collection: String,
}

impl SearchEngine {
    /// Create an engine from explicitly constructed components.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorRecordStore>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            provider,
            store,
            dimensions: config.dimensions,
            model: config.model.clone(),
            collection: config.collection.clone(),
        }
    }

    /// Build provider and store from the configuration and assemble the
    /// engine.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let provider = build_provider(config)?;
        let store = build_store(config)?;
        Ok(Self::new(provider, store, config))
    }

    /// The collection this engine reads and writes.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Access the underlying store (schema deployment etc.).
    pub fn store(&self) -> &Arc<dyn VectorRecordStore> {
        &self.store
    }

    async fn embed_text(&self, text: &str) -> Result<Embedding> {
        let mut request = EmbeddingRequest::new(text).with_dimensions(self.dimensions);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }
        debug!("Getting embedding for: {text}");
        let response = self.provider.embed(request).await?;
        Ok(response.embedding)
    }

    /// Embed each document's content concurrently, then upsert all of them
    /// by natural key. Returns the record ids in input order.
    pub async fn ingest(&self, documents: Vec<DocumentInput>) -> Result<Vec<RecordId>> {
        info!(
            "Ingesting {} documents into '{}'",
            documents.len(),
            self.collection
        );

        let embeddings =
            try_join_all(documents.iter().map(|d| self.embed_text(&d.content))).await?;

        let mut ids = Vec::with_capacity(documents.len());
        for (document, embedding) in documents.iter().zip(embeddings) {
            let id = self.store.upsert_by_key(
                &self.collection,
                &document.title,
                &document.content,
                Some(&embedding),
            )?;
            ids.push(id);
        }
        Ok(ids)
    }

    /// Embed and bulk-load documents in one batch; all-or-nothing.
    pub async fn ingest_bulk(&self, documents: Vec<DocumentInput>) -> Result<usize> {
        info!(
            "Bulk-ingesting {} documents into '{}'",
            documents.len(),
            self.collection
        );

        let embeddings =
            try_join_all(documents.iter().map(|d| self.embed_text(&d.content))).await?;

        let records: Vec<DocumentInput> = documents
            .into_iter()
            .zip(embeddings)
            .map(|(document, embedding)| document.with_embedding(embedding))
            .collect();

        Ok(self.store.bulk_insert(&self.collection, &records)?)
    }

    /// Embed the search phrase and return the `k` nearest records,
    /// ascending by distance.
    pub async fn search(
        &self,
        phrase: &str,
        k: usize,
        metric: DistanceMetric,
    ) -> Result<Vec<SearchResult>> {
        info!("Searching '{}' for: {phrase}", self.collection);
        let query = self.embed_text(phrase).await?;
        let results = self
            .store
            .top_k_by_distance(&self.collection, &query, k, metric)?;
        debug!("Search returned {} results", results.len());
        Ok(results)
    }
}
