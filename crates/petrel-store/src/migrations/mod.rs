//! Schema migrations, applied in order and recorded in schema_version.

mod v001_graph_tables;
mod v002_chunk_tables;

use rusqlite::Connection;

use petrel_core::errors::{PetrelError, PetrelResult, StoreError};

use crate::to_store_err;

/// Schema version the code expects.
pub const SCHEMA_VERSION: u32 = 2;

type MigrateFn = fn(&Connection) -> PetrelResult<()>;

const MIGRATIONS: &[(u32, MigrateFn)] = &[
    (1, v001_graph_tables::migrate),
    (2, v002_chunk_tables::migrate),
];

/// Apply all pending migrations.
pub fn run_migrations(conn: &Connection) -> PetrelResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;

    let applied = current_version(conn)?;
    for (version, migrate) in MIGRATIONS {
        if *version <= applied {
            continue;
        }
        migrate(conn).map_err(|e| {
            PetrelError::StoreError(StoreError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| to_store_err(e.to_string()))?;
        tracing::debug!(version, "applied schema migration");
    }
    Ok(())
}

/// Highest applied schema version, 0 when the table is empty or absent.
pub fn current_version(conn: &Connection) -> PetrelResult<u32> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_store_err(e.to_string()))?;
    if !exists {
        return Ok(0);
    }
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_store_err(e.to_string()))
}
