//! Hybrid retrieval over the PETase evidence corpus.
//!
//! Combines two indexes behind one backend: a semantic chunk index
//! (embedding similarity) and a typed relation graph. Callers get three
//! query shapes: plain vector search, single-seed graph lookup, and
//! diversity-aware multi-seed graph expansion with cross-seed
//! deduplication. Every query appends an audit event to a JSONL log.
//!
//! The backend is read-only at query time and is shared process-wide
//! through the [`runtime`] singleton.

pub mod aliases;
pub mod backend;
pub mod event_log;
pub mod runtime;

pub use backend::RetrievalBackend;
pub use event_log::EventLog;
pub use runtime::{RetrievalRuntime, RuntimeOptions};
