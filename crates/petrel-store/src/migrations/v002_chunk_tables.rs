//! v002: Chunk corpus tables (chunks, chunk_embeddings).
//!
//! Embeddings are stored as little-endian f32 blobs; search decodes
//! and scores them in memory rather than through a vector extension.

use rusqlite::Connection;

use petrel_core::errors::PetrelResult;

use crate::to_store_err;

pub fn migrate(conn: &Connection) -> PetrelResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS chunks (
            chunk_id    TEXT PRIMARY KEY,
            text        TEXT NOT NULL,
            metadata    TEXT NOT NULL DEFAULT '{}',
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS chunk_embeddings (
            chunk_id    TEXT PRIMARY KEY,
            embedding   BLOB NOT NULL,
            dimensions  INTEGER NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            FOREIGN KEY (chunk_id) REFERENCES chunks(chunk_id) ON DELETE CASCADE
        );
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}
