use thiserror::Error;

/// Errors raised by the evidence store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration v{version} failed: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("Evidence store not found at {path}; run `petrel ingest` first")]
    StoreMissing { path: String },

    #[error("Schema mismatch: expected version {expected}, found {found}")]
    SchemaMismatch { expected: u32, found: u32 },

    #[error("Connection pool error: {message}")]
    PoolError { message: String },
}
