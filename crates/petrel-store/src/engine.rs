//! StoreEngine owns the connection pool and implements IEvidenceStore.

use std::path::Path;

use petrel_core::errors::{PetrelError, PetrelResult, StoreError};
use petrel_core::models::{GraphEdge, SemanticHit};
use petrel_core::traits::IEvidenceStore;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{chunk_ops, graph_ops, vector_query};

/// The main evidence store. Owns the connection pool and provides
/// the full IEvidenceStore interface.
#[derive(Debug)]
pub struct StoreEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
}

impl StoreEngine {
    /// Open a store backed by a file on disk, creating the schema as
    /// needed. Used by ingest tooling.
    pub fn open(path: &Path, read_pool_size: usize) -> PetrelResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an existing store, refusing to create one. Used by the
    /// query path so a missing or stale database fails loudly instead
    /// of silently serving an empty corpus.
    pub fn open_existing(path: &Path, read_pool_size: usize) -> PetrelResult<Self> {
        if !path.exists() {
            return Err(PetrelError::StoreError(StoreError::StoreMissing {
                path: path.display().to_string(),
            }));
        }
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        let found = engine
            .pool
            .writer
            .with_conn(migrations::current_version)?;
        if found != migrations::SCHEMA_VERSION {
            return Err(PetrelError::StoreError(StoreError::SchemaMismatch {
                expected: migrations::SCHEMA_VERSION,
                found,
            }));
        }
        Ok(engine)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> PetrelResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations on the writer.
    fn initialize(&self) -> PetrelResult<()> {
        self.pool.writer.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> PetrelResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> PetrelResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }
}

impl IEvidenceStore for StoreEngine {
    fn insert_edge(&self, edge: &GraphEdge) -> PetrelResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| graph_ops::insert_edge(conn, edge))
    }

    fn insert_chunk(
        &self,
        chunk_id: &str,
        text: &str,
        metadata: &serde_json::Map<String, serde_json::Value>,
    ) -> PetrelResult<()> {
        self.pool
            .writer
            .with_conn(|conn| chunk_ops::insert_chunk(conn, chunk_id, text, metadata))
    }

    fn store_embedding(&self, chunk_id: &str, embedding: &[f32]) -> PetrelResult<()> {
        self.pool
            .writer
            .with_conn(|conn| chunk_ops::store_embedding(conn, chunk_id, embedding))
    }

    fn search_vector(&self, embedding: &[f32], top_k: usize) -> PetrelResult<Vec<SemanticHit>> {
        self.with_reader(|conn| vector_query::search_vector(conn, embedding, top_k))
    }

    fn neighbors(&self, entity: &str, limit: usize) -> PetrelResult<Vec<GraphEdge>> {
        self.with_reader(|conn| graph_ops::fetch_neighbors(conn, entity, limit))
    }

    fn edge_count(&self) -> PetrelResult<usize> {
        self.with_reader(graph_ops::edge_count)
    }

    fn chunk_count(&self) -> PetrelResult<usize> {
        self.with_reader(chunk_ops::chunk_count)
    }
}
