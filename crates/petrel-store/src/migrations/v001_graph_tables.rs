//! v001: Knowledge graph tables (nodes, edges).

use rusqlite::Connection;

use petrel_core::errors::PetrelResult;

use crate::to_store_err;

pub fn migrate(conn: &Connection) -> PetrelResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS nodes (
            id     INTEGER PRIMARY KEY AUTOINCREMENT,
            label  TEXT NOT NULL UNIQUE,
            type   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS edges (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id   INTEGER NOT NULL,
            relation    TEXT NOT NULL,
            target_id   INTEGER NOT NULL,
            paper       TEXT NOT NULL DEFAULT '',
            sentence    TEXT NOT NULL DEFAULT '',
            confidence  REAL NOT NULL DEFAULT 0.5,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            UNIQUE(source_id, relation, target_id, paper),
            FOREIGN KEY (source_id) REFERENCES nodes(id) ON DELETE CASCADE,
            FOREIGN KEY (target_id) REFERENCES nodes(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source_id);
        CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target_id);
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}
