use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS store_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS vectors (
            dataset TEXT NOT NULL,
            id TEXT NOT NULL,
            data TEXT NOT NULL,
            embedding BLOB NOT NULL,
            metadata TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            PRIMARY KEY (dataset, id)
        );

        CREATE INDEX IF NOT EXISTS idx_vectors_dataset ON vectors(dataset);
        "
    ).map_err(|e| DomainError::StoreUnavailable(format!("Migration failed: {e}")))
}
