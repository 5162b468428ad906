//! # petrel-ingest
//!
//! One-time corpus construction for the evidence store. Three stages,
//! each usable on its own:
//!
//! - [`extract`]: rule-based relation extraction over extracted paper
//!   text (one `.txt` per PDF).
//! - [`edges`]: JSONL edge files, in and out of the store.
//! - [`chunks`]: edge-to-document conversion, embedding, and storage
//!   for semantic search.
//!
//! [`pipeline`] wires the stages together behind the two entry points
//! the CLI `ingest` command calls. The query side never depends on
//! this crate; it only requires that the store was built once.

pub mod chunks;
pub mod edges;
pub mod extract;
pub mod pipeline;

pub use extract::EdgeExtractor;
pub use pipeline::{ingest_edges_file, ingest_text_dir, IngestReport};
