//! The vector record store capability trait.

use crate::Result;
use crate::record::{
    CollectionId, DistanceMetric, DocumentInput, RecordId, SearchResult, StoredDocument,
};

/// Capability interface for persisting and querying vector records.
///
/// Backing technology (embedded SQL engine, in-memory map, a remote
/// database) is an interchangeable implementation behind this trait,
/// selected by configuration rather than runtime type inspection.
///
/// Operations are synchronous per call. Implementations own their
/// connection for the duration of a single operation and release it on
/// every exit path; nothing is held across calls.
pub trait VectorRecordStore: Send + Sync {
    /// Create the backing schema if it does not exist. Idempotent.
    fn deploy(&self) -> Result<()>;

    /// Get or create a collection by name. Idempotent.
    fn get_or_create_collection(&self, name: &str) -> Result<CollectionId>;

    /// Insert or update a record keyed by (collection, title).
    ///
    /// If a row with the natural key exists its content and vector are
    /// replaced and the existing id is returned; otherwise a new row is
    /// inserted and the generated id is returned. The collection is created
    /// if absent.
    fn upsert_by_key(
        &self,
        collection: &str,
        title: &str,
        content: &str,
        embedding: Option<&[f32]>,
    ) -> Result<RecordId>;

    /// Top-K nearest rows to `query` within `collection`, ascending by
    /// `metric` distance.
    ///
    /// Rows without a vector are excluded. A missing collection or fewer
    /// than `k` matching rows yields a shorter (possibly empty) result,
    /// never an error.
    fn top_k_by_distance(
        &self,
        collection: &str,
        query: &[f32],
        k: usize,
        metric: DistanceMetric,
    ) -> Result<Vec<SearchResult>>;

    /// Insert many records in one batch; all-or-nothing.
    ///
    /// Returns the number of rows written. On any failure nothing is
    /// persisted.
    fn bulk_insert(&self, collection: &str, records: &[DocumentInput]) -> Result<usize>;

    /// Read a record back by natural key, including its vector.
    fn fetch_by_key(&self, collection: &str, title: &str) -> Result<Option<StoredDocument>>;
}
