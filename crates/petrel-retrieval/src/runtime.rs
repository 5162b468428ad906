//! RetrievalRuntime owns the store handle, the embedder, and the
//! backend built on top of them.
//!
//! Opening the store and priming the embedder is too expensive to do
//! per query, so the runtime is a singleton stored behind `OnceLock`:
//! initialized once via `initialize()`, then shared read-only through
//! `get()` for the lifetime of the process.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use petrel_core::config::PetrelConfig;
use petrel_core::errors::{PetrelResult, RetrievalError};
use petrel_core::traits::IEvidenceStore;
use petrel_embed::EmbedEngine;
use petrel_store::StoreEngine;
use tracing::{info, warn};

use crate::backend::RetrievalBackend;
use crate::event_log::{self, EventLog};

/// Global singleton.
static RUNTIME: OnceLock<Arc<RetrievalRuntime>> = OnceLock::new();

/// The shared query-side runtime. All fields are read-only after
/// construction.
pub struct RetrievalRuntime {
    pub store: Arc<StoreEngine>,
    pub backend: Arc<RetrievalBackend>,
    pub config: PetrelConfig,
}

/// Options for initializing the runtime.
#[derive(Default)]
pub struct RuntimeOptions {
    /// Path to the SQLite evidence store. If None, resolved from the
    /// configuration.
    pub db_path: Option<PathBuf>,
    /// Full configuration. If None, uses defaults.
    pub config: Option<PetrelConfig>,
}

impl RetrievalRuntime {
    fn new(opts: RuntimeOptions) -> PetrelResult<Self> {
        let config = opts.config.unwrap_or_default();
        let db_path = opts.db_path.unwrap_or_else(|| config.store.db_path());

        let store = Arc::new(StoreEngine::open_existing(
            &db_path,
            config.store.read_pool_size,
        )?);
        let embedder = EmbedEngine::new(&config.embedding);

        let log_path = PathBuf::from(&config.observability.log_dir).join(event_log::TRAJECTORY_LOG);
        let events = match EventLog::open(&log_path) {
            Ok(log) => log,
            Err(e) => {
                warn!(error = %e, path = %log_path.display(), "audit log unavailable, events disabled");
                EventLog::disabled()
            }
        };

        let edges = store.edge_count()?;
        let chunks = store.chunk_count()?;
        info!(db = %db_path.display(), edges, chunks, "retrieval runtime ready");

        let backend = Arc::new(RetrievalBackend::new(
            store.clone(),
            Box::new(embedder),
            events,
            config.retrieval.clone(),
        ));

        Ok(Self {
            store,
            backend,
            config,
        })
    }
}

/// Initialize the global runtime singleton.
///
/// Returns an error if already initialized or if the store cannot be
/// opened.
pub fn initialize(opts: RuntimeOptions) -> PetrelResult<()> {
    let runtime = RetrievalRuntime::new(opts)?;
    RUNTIME
        .set(Arc::new(runtime))
        .map_err(|_| RetrievalError::AlreadyInitialized.into())
}

/// Get a handle to the global runtime.
///
/// Returns an error if not yet initialized.
pub fn get() -> PetrelResult<Arc<RetrievalRuntime>> {
    RUNTIME
        .get()
        .cloned()
        .ok_or_else(|| RetrievalError::NotInitialized.into())
}

/// Check if the runtime has been initialized.
pub fn is_initialized() -> bool {
    RUNTIME.get().is_some()
}
