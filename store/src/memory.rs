//! In-memory backend for tests and offline use.
//!
//! Same contract as the SQL backend, with distance computed locally by the
//! [`crate::distance`] helpers. Data does not survive the process.

use std::collections::HashMap;
use std::sync::Mutex;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::Embedding;
use crate::distance::{cosine_distance, l2_distance};
use crate::error::{Result, StoreError};
use crate::record::{
    CollectionId, DistanceMetric, DocumentInput, RecordId, SearchResult, StoredDocument,
};
use crate::store::VectorRecordStore;

#[derive(Debug, Clone)]
struct MemoryRecord {
    id: RecordId,
    title: String,
    content: String,
    embedding: Option<Embedding>,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<String, (CollectionId, Vec<MemoryRecord>)>,
    next_collection_id: CollectionId,
    next_record_id: RecordId,
}

/// Vector record store held entirely in memory.
pub struct MemoryVectorStore {
    dimension: usize,
    state: Mutex<MemoryState>,
}

impl MemoryVectorStore {
    /// Create an empty store expecting vectors of `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(StoreError::InvalidVector {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl VectorRecordStore for MemoryVectorStore {
    fn deploy(&self) -> Result<()> {
        Ok(())
    }

    fn get_or_create_collection(&self, name: &str) -> Result<CollectionId> {
        let mut state = self.lock()?;
        if let Some((id, _)) = state.collections.get(name) {
            return Ok(*id);
        }
        state.next_collection_id += 1;
        let id = state.next_collection_id;
        state.collections.insert(name.to_string(), (id, Vec::new()));
        debug!("Created collection '{name}'");
        Ok(id)
    }

    fn upsert_by_key(
        &self,
        collection: &str,
        title: &str,
        content: &str,
        embedding: Option<&[f32]>,
    ) -> Result<RecordId> {
        if let Some(vector) = embedding {
            self.check_dimension(vector)?;
        }

        let mut state = self.lock()?;
        if !state.collections.contains_key(collection) {
            state.next_collection_id += 1;
            let id = state.next_collection_id;
            state
                .collections
                .insert(collection.to_string(), (id, Vec::new()));
        }
        state.next_record_id += 1;
        let next_id = state.next_record_id;

        let (_, records) = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::Unavailable("collection vanished".to_string()))?;

        if let Some(record) = records.iter_mut().find(|r| r.title == title) {
            record.content = content.to_string();
            record.embedding = embedding.map(<[f32]>::to_vec);
            return Ok(record.id);
        }

        records.push(MemoryRecord {
            id: next_id,
            title: title.to_string(),
            content: content.to_string(),
            embedding: embedding.map(<[f32]>::to_vec),
        });
        Ok(next_id)
    }

    fn top_k_by_distance(
        &self,
        collection: &str,
        query: &[f32],
        k: usize,
        metric: DistanceMetric,
    ) -> Result<Vec<SearchResult>> {
        self.check_dimension(query)?;

        let state = self.lock()?;
        let Some((_, records)) = state.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<(OrderedFloat<f64>, SearchResult)> = Vec::new();
        for record in records {
            // Vectorless rows are excluded, mirroring the SQL backend.
            let Some(vector) = &record.embedding else {
                continue;
            };
            let distance = match metric {
                DistanceMetric::Cosine => cosine_distance(query, vector)?,
                DistanceMetric::L2 => l2_distance(query, vector)?,
            };
            scored.push((
                OrderedFloat(distance),
                SearchResult {
                    id: record.id,
                    title: record.title.clone(),
                    content: Some(record.content.clone()),
                    distance,
                },
            ));
        }

        scored.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(scored.into_iter().take(k).map(|(_, r)| r).collect())
    }

    fn bulk_insert(&self, collection: &str, records: &[DocumentInput]) -> Result<usize> {
        // Validate everything before touching state: all-or-nothing.
        for record in records {
            if let Some(vector) = &record.embedding {
                self.check_dimension(vector)?;
            }
        }

        let mut state = self.lock()?;
        if !state.collections.contains_key(collection) {
            state.next_collection_id += 1;
            let id = state.next_collection_id;
            state
                .collections
                .insert(collection.to_string(), (id, Vec::new()));
        }

        let mut staged = Vec::with_capacity(records.len());
        let mut next_id = state.next_record_id;
        for record in records {
            next_id += 1;
            staged.push(MemoryRecord {
                id: next_id,
                title: record.title.clone(),
                content: record.content.clone(),
                embedding: record.embedding.clone(),
            });
        }
        state.next_record_id = next_id;

        let (_, existing) = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::Unavailable("collection vanished".to_string()))?;
        let count = staged.len();
        existing.extend(staged);
        Ok(count)
    }

    fn fetch_by_key(&self, collection: &str, title: &str) -> Result<Option<StoredDocument>> {
        let state = self.lock()?;
        let Some((_, records)) = state.collections.get(collection) else {
            return Ok(None);
        };
        Ok(records.iter().find(|r| r.title == title).map(|r| {
            StoredDocument {
                id: r.id,
                title: r.title.clone(),
                content: Some(r.content.clone()),
                embedding: r.embedding.clone(),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_upsert_is_idempotent() {
        let store = MemoryVectorStore::new(3);
        let id1 = store
            .upsert_by_key("blog", "Hello", "first", Some(&[1.0, 0.0, 0.0]))
            .unwrap();
        let id2 = store
            .upsert_by_key("blog", "Hello", "second", Some(&[0.0, 1.0, 0.0]))
            .unwrap();
        assert_eq!(id1, id2);

        let doc = store.fetch_by_key("blog", "Hello").unwrap().unwrap();
        assert_eq!(doc.content.as_deref(), Some("second"));
        assert_eq!(doc.embedding, Some(vec![0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_top_k_orders_ascending() {
        let store = MemoryVectorStore::new(2);
        store
            .upsert_by_key("c", "east", "", Some(&[1.0, 0.0]))
            .unwrap();
        store
            .upsert_by_key("c", "north", "", Some(&[0.0, 1.0]))
            .unwrap();
        store
            .upsert_by_key("c", "diagonal", "", Some(&[0.7, 0.7]))
            .unwrap();

        let results = store
            .top_k_by_distance("c", &[1.0, 0.0], 2, DistanceMetric::Cosine)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "east");
        assert_eq!(results[1].title, "diagonal");
        assert!(results[0].distance <= results[1].distance);
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let store = MemoryVectorStore::new(2);
        let results = store
            .top_k_by_distance("absent", &[1.0, 0.0], 5, DistanceMetric::Cosine)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_wrong_dimension_rejected() {
        let store = MemoryVectorStore::new(3);
        let err = store
            .upsert_by_key("c", "t", "", Some(&[1.0, 0.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidVector {
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn test_vectorless_rows_excluded_from_search() {
        let store = MemoryVectorStore::new(2);
        store.upsert_by_key("c", "plain", "no vector", None).unwrap();
        store
            .upsert_by_key("c", "vectored", "", Some(&[1.0, 0.0]))
            .unwrap();

        let results = store
            .top_k_by_distance("c", &[1.0, 0.0], 10, DistanceMetric::Cosine)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "vectored");
    }
}
