//! The ingest entry points the CLI drives.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use petrel_core::errors::PetrelResult;
use petrel_core::models::GraphEdge;
use petrel_core::traits::{IEmbedder, IEvidenceStore};

use crate::{chunks, edges, extract};

/// What an ingest run did, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub edges_loaded: usize,
    pub edges_inserted: usize,
    pub chunks_embedded: usize,
}

/// Ingest a prepared JSONL edge file: store the graph rows, then
/// embed one chunk per edge for semantic search.
pub fn ingest_edges_file(
    store: &dyn IEvidenceStore,
    embedder: &dyn IEmbedder,
    edges_path: &Path,
) -> PetrelResult<IngestReport> {
    let loaded = edges::load_edges(edges_path)?;
    info!(path = %edges_path.display(), edges = loaded.len(), "edge file loaded");
    ingest_edges(store, embedder, loaded)
}

/// Extract edges from a directory of paper text files, then store and
/// embed them. Optionally writes the extracted edges out as JSONL for
/// inspection and re-runs.
pub fn ingest_text_dir(
    store: &dyn IEvidenceStore,
    embedder: &dyn IEmbedder,
    text_dir: &Path,
    out_edges: Option<&Path>,
) -> PetrelResult<IngestReport> {
    let extracted = extract::extract_dir(text_dir)?;
    if let Some(out) = out_edges {
        edges::write_edges_jsonl(out, &extracted)?;
        info!(path = %out.display(), edges = extracted.len(), "edge file written");
    }
    ingest_edges(store, embedder, extracted)
}

fn ingest_edges(
    store: &dyn IEvidenceStore,
    embedder: &dyn IEmbedder,
    loaded: Vec<GraphEdge>,
) -> PetrelResult<IngestReport> {
    let inserted = edges::store_edges(store, &loaded)?;
    let docs = chunks::build_documents(&loaded);
    let embedded = chunks::embed_and_store(store, embedder, &docs)?;
    Ok(IngestReport {
        edges_loaded: loaded.len(),
        edges_inserted: inserted,
        chunks_embedded: embedded,
    })
}
