//! Edge-to-chunk conversion for the semantic index.
//!
//! Every edge becomes one searchable document restating the triple
//! with its evidence sentence. Chunk ids are content hashes, so
//! re-ingesting the same corpus overwrites rows in place instead of
//! duplicating them.

use serde_json::{Map, Value};
use tracing::info;

use petrel_core::errors::PetrelResult;
use petrel_core::models::GraphEdge;
use petrel_core::traits::{IEmbedder, IEvidenceStore};

/// A document ready for embedding, with its search metadata.
#[derive(Debug, Clone)]
pub struct ChunkDoc {
    pub chunk_id: String,
    pub text: String,
    pub metadata: Map<String, Value>,
}

/// Restate edges as chunk documents:
/// `"<source> <relation> <target>. Evidence: <sentence>"`.
pub fn build_documents(edges: &[GraphEdge]) -> Vec<ChunkDoc> {
    edges
        .iter()
        .map(|edge| {
            let text = format!(
                "{} {} {}. Evidence: {}",
                edge.source, edge.relation, edge.target, edge.sentence
            );
            let mut metadata = Map::new();
            metadata.insert("source".to_string(), Value::String(edge.source.clone()));
            metadata.insert("relation".to_string(), Value::String(edge.relation.clone()));
            metadata.insert("target".to_string(), Value::String(edge.target.clone()));
            metadata.insert("paper".to_string(), Value::String(edge.paper.clone()));
            ChunkDoc {
                chunk_id: chunk_id_for(&text),
                text,
                metadata,
            }
        })
        .collect()
}

/// Content-hash chunk id, short enough to read in logs.
fn chunk_id_for(text: &str) -> String {
    let hex = blake3::hash(text.as_bytes()).to_hex();
    format!("edge-{}", &hex[..16])
}

/// Insert each document and its embedding. Returns how many documents
/// were embedded; the first provider or store failure aborts the run.
pub fn embed_and_store(
    store: &dyn IEvidenceStore,
    embedder: &dyn IEmbedder,
    docs: &[ChunkDoc],
) -> PetrelResult<usize> {
    for doc in docs {
        store.insert_chunk(&doc.chunk_id, &doc.text, &doc.metadata)?;
        let embedding = embedder.embed(&doc.text)?;
        store.store_embedding(&doc.chunk_id, &embedding)?;
    }
    info!(
        chunks = docs.len(),
        provider = embedder.name(),
        "chunk corpus embedded"
    );
    Ok(docs.len())
}
