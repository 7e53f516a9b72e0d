//! SQLite backend with engine-native vector distance.
//!
//! Vectors are stored as float32 blobs, the canonical sqlite-vec layout.
//! Distance is computed inside the engine by `vec_distance_cosine` /
//! `vec_distance_l2`; this module never does the math itself.

use std::path::PathBuf;
use std::sync::Once;

use rusqlite::ffi::sqlite3_auto_extension;
use rusqlite::{Connection, OptionalExtension, params};
use sqlite_vec::sqlite3_vec_init;
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{Result, StoreError};
use crate::record::{
    CollectionId, DistanceMetric, DocumentInput, RecordId, SearchResult, StoredDocument,
};
use crate::store::VectorRecordStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS collections (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS documents (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    collection_id  INTEGER NOT NULL REFERENCES collections(id),
    title          TEXT NOT NULL,
    content        TEXT,
    embedding      BLOB,
    UNIQUE (collection_id, title)
);
";

/// Register the sqlite-vec extension for every connection opened by this
/// process. Standard registration path from the sqlite-vec documentation.
#[allow(clippy::missing_transmute_annotations)]
fn register_sqlite_vec() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| unsafe {
        sqlite3_auto_extension(Some(std::mem::transmute(sqlite3_vec_init as *const ())));
    });
}

/// Encode a vector as a float32 little-endian blob.
fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

/// Decode a float32 little-endian blob back into a vector.
fn vector_from_blob(blob: &[u8]) -> Result<Embedding> {
    if blob.len() % 4 != 0 {
        return Err(StoreError::MalformedVector(blob.len()));
    }
    Ok(blob
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Vector record store backed by SQLite + sqlite-vec.
///
/// Holds only a database path and the expected vector dimension; every
/// operation opens its own connection and releases it on return, including
/// error paths.
pub struct SqliteVectorStore {
    path: PathBuf,
    dimension: usize,
}

impl SqliteVectorStore {
    /// Create a store for the database at `path` expecting vectors of
    /// `dimension`.
    pub fn new(path: impl Into<PathBuf>, dimension: usize) -> Self {
        Self {
            path: path.into(),
            dimension,
        }
    }

    /// The expected vector dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether both expected tables exist.
    pub fn schema_deployed(&self) -> Result<bool> {
        let conn = self.open()?;
        Self::tables_present(&conn)
    }

    fn open(&self) -> Result<Connection> {
        register_sqlite_vec();
        Connection::open(&self.path).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Open a connection and verify the schema is present.
    fn connect(&self) -> Result<Connection> {
        let conn = self.open()?;
        if !Self::tables_present(&conn)? {
            return Err(StoreError::SchemaNotDeployed);
        }
        Ok(conn)
    }

    fn tables_present(conn: &Connection) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table' AND name IN ('collections', 'documents')",
            [],
            |row| row.get(0),
        )?;
        Ok(count == 2)
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

    fn collection_id_or_create(conn: &Connection, name: &str) -> Result<CollectionId> {
        let existing: Option<CollectionId> = conn
            .query_row(
                "SELECT id FROM collections WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        info!("Creating collection '{name}'");
        conn.execute("INSERT INTO collections (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }
}

impl VectorRecordStore for SqliteVectorStore {
    fn deploy(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute_batch(SCHEMA)?;
        info!("Schema deployed at {}", self.path.display());
        Ok(())
    }

    fn get_or_create_collection(&self, name: &str) -> Result<CollectionId> {
        let conn = self.connect()?;
        Self::collection_id_or_create(&conn, name)
    }

    fn upsert_by_key(
        &self,
        collection: &str,
        title: &str,
        content: &str,
        embedding: Option<&[f32]>,
    ) -> Result<RecordId> {
        let blob = match embedding {
            Some(vector) => {
                self.check_dimension(vector)?;
                Some(vector_to_blob(vector))
            }
            None => None,
        };

        let mut conn = self.connect()?;

        // Lookup-then-write in one transaction so concurrent upserts of the
        // same key cannot interleave.
        let tx = conn.transaction()?;
        let collection_id = Self::collection_id_or_create(&tx, collection)?;

        let existing: Option<RecordId> = tx
            .query_row(
                "SELECT id FROM documents WHERE collection_id = ?1 AND title = ?2",
                params![collection_id, title],
                |row| row.get(0),
            )
            .optional()?;

        let id = match existing {
            Some(id) => {
                debug!("Updating '{title}' in '{collection}'");
                tx.execute(
                    "UPDATE documents SET content = ?1, embedding = ?2 WHERE id = ?3",
                    params![content, blob, id],
                )?;
                id
            }
            None => {
                debug!("Inserting '{title}' into '{collection}'");
                tx.execute(
                    "INSERT INTO documents (collection_id, title, content, embedding)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![collection_id, title, content, blob],
                )?;
                tx.last_insert_rowid()
            }
        };

        tx.commit()?;
        Ok(id)
    }

    fn top_k_by_distance(
        &self,
        collection: &str,
        query: &[f32],
        k: usize,
        metric: DistanceMetric,
    ) -> Result<Vec<SearchResult>> {
        self.check_dimension(query)?;

        let conn = self.connect()?;

        // Rows without a vector are excluded rather than reported with a
        // sentinel distance.
        let sql = format!(
            "SELECT d.id, d.title, d.content, {}(d.embedding, ?2) AS distance
             FROM documents d
             JOIN collections c ON d.collection_id = c.id
             WHERE c.name = ?1 AND d.embedding IS NOT NULL
             ORDER BY distance ASC
             LIMIT ?3",
            metric.sql_function()
        );

        let blob = vector_to_blob(query);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![collection, blob, k as i64], |row| {
            Ok(SearchResult {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
                distance: row.get(3)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }

        debug!(
            "Top-{k} query in '{collection}' returned {} rows",
            results.len()
        );
        Ok(results)
    }

    fn bulk_insert(&self, collection: &str, records: &[DocumentInput]) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let collection_id = Self::collection_id_or_create(&tx, collection)?;

        let mut written = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (collection_id, title, content, embedding)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for record in records {
                let blob = match &record.embedding {
                    Some(vector) => {
                        self.check_dimension(vector)?;
                        Some(vector_to_blob(vector))
                    }
                    None => None,
                };
                stmt.execute(params![collection_id, record.title, record.content, blob])?;
                written += 1;
            }
        }

        tx.commit()?;
        info!("Bulk-inserted {written} rows into '{collection}'");
        Ok(written)
    }

    fn fetch_by_key(&self, collection: &str, title: &str) -> Result<Option<StoredDocument>> {
        let conn = self.connect()?;

        let row: Option<(RecordId, String, Option<String>, Option<Vec<u8>>)> = conn
            .query_row(
                "SELECT d.id, d.title, d.content, d.embedding
                 FROM documents d
                 JOIN collections c ON d.collection_id = c.id
                 WHERE c.name = ?1 AND d.title = ?2",
                params![collection, title],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((id, title, content, blob)) = row else {
            return Ok(None);
        };

        let embedding = match blob {
            Some(bytes) => Some(vector_from_blob(&bytes)?),
            None => None,
        };

        Ok(Some(StoredDocument {
            id,
            title,
            content,
            embedding,
        }))
    }
}
