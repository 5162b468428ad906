//! # petrel-store
//!
//! SQLite persistence layer for the knowledge graph (nodes, edges) and
//! the chunk corpus (text, metadata, embeddings). One writer connection
//! behind a mutex, a small round-robin pool of readers, WAL throughout.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StoreEngine;
pub use pool::ConnectionPool;

use petrel_core::errors::{PetrelError, StoreError};

/// Wrap a low-level SQLite failure message in the workspace error type.
pub fn to_store_err(message: String) -> PetrelError {
    PetrelError::StoreError(StoreError::SqliteError { message })
}
