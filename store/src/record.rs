//! Record and result types for the vector store.

use serde::{Deserialize, Serialize};

use crate::Embedding;

/// Identifier of a stored record (engine-generated integer key).
pub type RecordId = i64;

/// Identifier of a collection.
pub type CollectionId = i64;

/// A document to be persisted: natural key, free text, optional vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Natural key within the parent collection.
    pub title: String,

    /// Free-text content.
    pub content: String,

    /// Embedding of the content, if already computed.
    pub embedding: Option<Embedding>,
}

impl DocumentInput {
    /// Create a document with no embedding yet.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            embedding: None,
        }
    }

    /// Attach an embedding.
    pub fn with_embedding(mut self, embedding: Embedding) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// A document read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Engine-generated record id.
    pub id: RecordId,

    /// Natural key within the collection.
    pub title: String,

    /// Free-text content.
    pub content: Option<String>,

    /// Stored embedding, if the row has one.
    pub embedding: Option<Embedding>,
}

/// A nearest-neighbor search result, ordered ascending by distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Record id of the matched row.
    pub id: RecordId,

    /// Natural key of the matched row.
    pub title: String,

    /// Original text, if stored.
    pub content: Option<String>,

    /// Distance to the query vector; for cosine this lies in [0, 2],
    /// 0 meaning identical direction.
    pub distance: f64,
}

/// Named distance function, resolved to the engine's SQL function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Cosine distance (1 - cosine similarity).
    #[default]
    Cosine,
    /// Euclidean (L2) distance.
    L2,
}

impl DistanceMetric {
    /// Name of the engine's SQL function for this metric.
    pub fn sql_function(self) -> &'static str {
        match self {
            Self::Cosine => "vec_distance_cosine",
            Self::L2 => "vec_distance_l2",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_builder() {
        let doc = DocumentInput::new("Hello World", "I wrote an app!")
            .with_embedding(vec![1.0, 2.0, 3.0]);
        assert_eq!(doc.title, "Hello World");
        assert_eq!(doc.embedding, Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_metric_sql_function_names() {
        assert_eq!(DistanceMetric::Cosine.sql_function(), "vec_distance_cosine");
        assert_eq!(DistanceMetric::L2.sql_function(), "vec_distance_l2");
    }
}
