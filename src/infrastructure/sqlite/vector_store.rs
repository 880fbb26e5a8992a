use crate::domain::entities::document::Metadata;
use crate::domain::entities::search_result::SearchResult;
use crate::domain::entities::stored_vector::VectorEntry;
use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::{validate_embedding, validate_entry, VectorStore};
use crate::domain::values::similarity::rank_top_k;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

const DIMENSION_KEY: &str = "dimension";

// The upsert keeps the row (and its rowid) so ranking ties still follow first insertion.
const UPSERT_SQL: &str = "INSERT INTO vectors (dataset, id, data, embedding, metadata, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
     ON CONFLICT(dataset, id) DO UPDATE SET
        data = excluded.data,
        embedding = excluded.embedding,
        metadata = excluded.metadata";

/// Persistent store: one row per vector, full scan per query.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    dimension: usize,
}

impl SqliteVectorStore {
    /// Opens a store over `conn`, migrating it and pinning its dimension.
    ///
    /// A database created with another dimension is refused rather than mixed.
    pub fn new(conn: Connection, dimension: usize) -> Result<Self, DomainError> {
        if dimension == 0 {
            return Err(DomainError::InvalidInput("vector dimension must be at least 1".into()));
        }
        run_migrations(&conn)?;
        match Self::stored_dimension(&conn)? {
            Some(stored) if stored != dimension => {
                warn!(stored, dimension, "vector store was created with another dimension");
                return Err(DomainError::DimensionMismatch {
                    expected: stored,
                    actual: dimension,
                });
            }
            Some(_) => {}
            None => {
                conn.execute(
                    "INSERT INTO store_meta (key, value) VALUES (?1, ?2)",
                    params![DIMENSION_KEY, dimension.to_string()],
                )
                .map_err(|e| DomainError::StoreUnavailable(format!("Failed to record dimension: {e}")))?;
                info!(dimension, "initialised sqlite vector store");
            }
        }
        Ok(Self {
            conn: Mutex::new(conn),
            dimension,
        })
    }

    pub fn open(path: &str, dimension: usize) -> Result<Self, DomainError> {
        let conn = Connection::open(path).map_err(|e| DomainError::StoreUnavailable(format!("DB error: {e}")))?;
        if path != ":memory:" {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(|e| DomainError::StoreUnavailable(format!("WAL error: {e}")))?;
        }
        Self::new(conn, dimension)
    }

    fn stored_dimension(conn: &Connection) -> Result<Option<usize>, DomainError> {
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM store_meta WHERE key = ?1",
                params![DIMENSION_KEY],
                |r| r.get(0),
            )
            .optional()
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
        value
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|e| DomainError::StoreUnavailable(format!("Corrupt stored dimension '{v}': {e}")))
            })
            .transpose()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DomainError> {
        self.conn.lock().map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }

    fn serialize_vector(v: &[f64]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f64> {
        bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                f64::from_le_bytes(buf)
            })
            .collect()
    }

    fn write_entry(conn: &Connection, dataset: &str, entry: &VectorEntry) -> Result<(), DomainError> {
        let metadata = serde_json::to_string(&entry.metadata)
            .map_err(|e| DomainError::InvalidInput(format!("Unserializable metadata: {e}")))?;
        conn.execute(
            UPSERT_SQL,
            params![
                dataset,
                entry.id,
                entry.data,
                Self::serialize_vector(&entry.embedding),
                metadata,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| DomainError::StoreUnavailable(format!("Failed to store vector: {e}")))?;
        Ok(())
    }
}

impl VectorStore for SqliteVectorStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn insert(&self, dataset: &str, entry: VectorEntry) -> Result<(), DomainError> {
        validate_entry(&entry, self.dimension)?;
        let conn = self.lock()?;
        Self::write_entry(&conn, dataset, &entry)
    }

    fn batch_insert(&self, dataset: &str, entries: Vec<VectorEntry>) -> Vec<Result<(), DomainError>> {
        let mut results: Vec<Result<(), DomainError>> =
            entries.iter().map(|e| validate_entry(e, self.dimension)).collect();

        let fail_valid = |results: &mut Vec<Result<(), DomainError>>, msg: &str| {
            for r in results.iter_mut().filter(|r| r.is_ok()) {
                *r = Err(DomainError::StoreUnavailable(msg.to_string()));
            }
        };

        let mut conn = match self.lock() {
            Ok(c) => c,
            Err(e) => {
                fail_valid(&mut results, &e.to_string());
                return results;
            }
        };
        let tx = match conn.transaction() {
            Ok(tx) => tx,
            Err(e) => {
                fail_valid(&mut results, &format!("Failed to begin transaction: {e}"));
                return results;
            }
        };

        for (entry, result) in entries.iter().zip(results.iter_mut()) {
            if result.is_ok() {
                *result = Self::write_entry(&tx, dataset, entry);
            }
        }

        if let Err(e) = tx.commit() {
            fail_valid(&mut results, &format!("Failed to commit batch: {e}"));
            return results;
        }
        debug!(
            dataset,
            inserted = results.iter().filter(|r| r.is_ok()).count(),
            "batch insert committed"
        );
        results
    }

    fn query(&self, dataset: &str, embedding: &[f64], top_k: usize) -> Result<Vec<SearchResult>, DomainError> {
        validate_embedding(embedding, self.dimension)?;
        if top_k == 0 {
            return Ok(vec![]);
        }
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, data, embedding, metadata FROM vectors WHERE dataset = ?1 ORDER BY rowid")
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
        let rows = stmt
            .query_map(params![dataset], |row| {
                let id: String = row.get(0)?;
                let data: String = row.get(1)?;
                let blob: Vec<u8> = row.get(2)?;
                let metadata: String = row.get(3)?;
                Ok((id, data, blob, metadata))
            })
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        let candidates = rows.into_iter().map(|(id, data, blob, metadata)| {
            let stored = Self::deserialize_vector(&blob);
            ((id, data, metadata), stored)
        });

        rank_top_k(embedding, candidates, top_k)
            .into_iter()
            .map(|((id, data, metadata), score)| {
                let metadata: Metadata = serde_json::from_str(&metadata)
                    .map_err(|e| DomainError::StoreUnavailable(format!("Corrupt metadata for '{id}': {e}")))?;
                Ok(SearchResult { id, data, metadata, score })
            })
            .collect()
    }

    fn clear(&self, dataset: &str) -> Result<(), DomainError> {
        let conn = self.lock()?;
        let removed = conn
            .execute("DELETE FROM vectors WHERE dataset = ?1", params![dataset])
            .map_err(|e| DomainError::StoreUnavailable(format!("Failed to clear dataset: {e}")))?;
        debug!(dataset, removed, "cleared dataset");
        Ok(())
    }

    fn count(&self, dataset: &str) -> Result<usize, DomainError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM vectors WHERE dataset = ?1",
                params![dataset],
                |r| r.get(0),
            )
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
        Ok(count as usize)
    }
}
