//! Integration tests for the SQLite backend.
//!
//! These run against a real database file with the sqlite-vec extension
//! loaded; distance values come from the engine, not from Rust code.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use vecsql_store::{
    DistanceMetric, DocumentInput, SqliteVectorStore, StoreError, VectorRecordStore,
};

fn store_with_schema(dir: &TempDir, dimension: usize) -> SqliteVectorStore {
    let store = SqliteVectorStore::new(dir.path().join("vec.db"), dimension);
    store.deploy().unwrap();
    store
}

#[test]
fn operations_before_deploy_report_schema_not_deployed() {
    let dir = TempDir::new().unwrap();
    let store = SqliteVectorStore::new(dir.path().join("vec.db"), 3);

    let err = store
        .upsert_by_key("blog", "Hello", "text", Some(&[1.0, 2.0, 3.0]))
        .unwrap_err();
    assert!(matches!(err, StoreError::SchemaNotDeployed));
    assert!(!store.schema_deployed().unwrap());
}

#[test]
fn deploy_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 3);
    store.deploy().unwrap();
    assert!(store.schema_deployed().unwrap());
}

#[test]
fn get_or_create_collection_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 3);

    let first = store.get_or_create_collection("Sample blog").unwrap();
    let second = store.get_or_create_collection("Sample blog").unwrap();
    assert_eq!(first, second);
}

#[test]
fn upsert_twice_leaves_one_row_with_latest_values() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 3);

    let id1 = store
        .upsert_by_key("Sample blog", "Hello World", "first draft", Some(&[1.0, 2.0, 3.0]))
        .unwrap();
    let id2 = store
        .upsert_by_key("Sample blog", "Hello World", "I wrote an app!", Some(&[3.0, 2.0, 1.0]))
        .unwrap();
    assert_eq!(id1, id2);

    let doc = store
        .fetch_by_key("Sample blog", "Hello World")
        .unwrap()
        .unwrap();
    assert_eq!(doc.content.as_deref(), Some("I wrote an app!"));
    assert_eq!(doc.embedding, Some(vec![3.0, 2.0, 1.0]));
}

#[test]
fn vector_round_trips_within_tolerance() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 3);

    let written = vec![0.123_f32, -4.5, 6.789];
    store
        .upsert_by_key("blog", "round trip", "text", Some(&written))
        .unwrap();

    let read_back = store
        .fetch_by_key("blog", "round trip")
        .unwrap()
        .unwrap()
        .embedding
        .unwrap();

    assert_eq!(read_back.len(), written.len());
    for (w, r) in written.iter().zip(read_back.iter()) {
        assert!((w - r).abs() < 1e-6);
    }
}

#[test]
fn identical_vector_has_near_zero_cosine_distance() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 3);

    store
        .upsert_by_key("Sample blog", "Hello World", "I wrote an app!", Some(&[1.0, 2.0, 3.0]))
        .unwrap();

    let results = store
        .top_k_by_distance("Sample blog", &[1.0, 2.0, 3.0], 1, DistanceMetric::Cosine)
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Hello World");
    assert!(results[0].distance.abs() < 1e-5);
}

#[test]
fn top_k_orders_ascending_and_caps_at_row_count() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 3);

    store
        .upsert_by_key("blog", "east", "", Some(&[1.0, 0.0, 0.0]))
        .unwrap();
    store
        .upsert_by_key("blog", "north", "", Some(&[0.0, 1.0, 0.0]))
        .unwrap();
    store
        .upsert_by_key("blog", "diagonal", "", Some(&[0.7, 0.7, 0.0]))
        .unwrap();

    // k exceeds the row count: all rows come back, not an error.
    let results = store
        .top_k_by_distance("blog", &[1.0, 0.0, 0.0], 5, DistanceMetric::Cosine)
        .unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].title, "east");
    assert_eq!(results[1].title, "diagonal");
    assert_eq!(results[2].title, "north");
    for pair in results.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[test]
fn missing_collection_returns_empty_not_error() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 3);

    let results = store
        .top_k_by_distance("no such blog", &[1.0, 0.0, 0.0], 5, DistanceMetric::Cosine)
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn rows_without_vectors_are_excluded_from_search() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 3);

    store
        .upsert_by_key("blog", "plain", "no vector here", None)
        .unwrap();
    store
        .upsert_by_key("blog", "vectored", "", Some(&[1.0, 0.0, 0.0]))
        .unwrap();

    let results = store
        .top_k_by_distance("blog", &[1.0, 0.0, 0.0], 10, DistanceMetric::Cosine)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "vectored");
}

#[test]
fn wrong_length_vector_is_invalid_on_write() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 1536);

    let err = store
        .upsert_by_key("blog", "short", "text", Some(&[1.0, 2.0, 3.0]))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidVector {
            expected: 1536,
            got: 3
        }
    ));
}

#[test]
fn l2_metric_orders_by_euclidean_distance() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 2);

    store
        .upsert_by_key("c", "near", "", Some(&[1.0, 1.0]))
        .unwrap();
    store
        .upsert_by_key("c", "far", "", Some(&[10.0, 10.0]))
        .unwrap();

    let results = store
        .top_k_by_distance("c", &[0.0, 0.0], 2, DistanceMetric::L2)
        .unwrap();
    assert_eq!(results[0].title, "near");
    assert!((results[0].distance - 2.0_f64.sqrt()).abs() < 1e-5);
    assert_eq!(results[1].title, "far");
}

#[test]
fn bulk_insert_writes_all_rows() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 2);

    let records: Vec<DocumentInput> = (0..50)
        .map(|i| {
            DocumentInput::new(format!("doc-{i}"), format!("This is a test {i}"))
                .with_embedding(vec![i as f32, 1.0])
        })
        .collect();

    let written = store.bulk_insert("bulk", &records).unwrap();
    assert_eq!(written, 50);

    let results = store
        .top_k_by_distance("bulk", &[0.0, 1.0], 50, DistanceMetric::Cosine)
        .unwrap();
    assert_eq!(results.len(), 50);
    assert_eq!(results[0].title, "doc-0");
}

#[test]
fn bulk_insert_is_all_or_nothing() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 2);

    let records = vec![
        DocumentInput::new("good", "fine").with_embedding(vec![1.0, 0.0]),
        DocumentInput::new("bad", "wrong length").with_embedding(vec![1.0, 0.0, 0.0]),
    ];

    let err = store.bulk_insert("bulk", &records).unwrap_err();
    assert!(matches!(err, StoreError::InvalidVector { .. }));

    // The valid row must not have been persisted either.
    assert!(store.fetch_by_key("bulk", "good").unwrap().is_none());
}

#[test]
fn fetch_missing_key_returns_none() {
    let dir = TempDir::new().unwrap();
    let store = store_with_schema(&dir, 3);
    assert!(store.fetch_by_key("blog", "absent").unwrap().is_none());
}
