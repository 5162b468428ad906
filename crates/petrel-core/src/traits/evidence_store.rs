use crate::errors::PetrelResult;
use crate::models::{GraphEdge, SemanticHit};

/// Persistence layer for the knowledge graph and chunk corpus.
pub trait IEvidenceStore: Send + Sync {
    // --- Ingest ---
    /// Insert an edge, ignoring exact duplicates. Returns whether a row
    /// was actually written.
    fn insert_edge(&self, edge: &GraphEdge) -> PetrelResult<bool>;
    /// Insert a chunk with its metadata, returning the chunk id.
    fn insert_chunk(
        &self,
        chunk_id: &str,
        text: &str,
        metadata: &serde_json::Map<String, serde_json::Value>,
    ) -> PetrelResult<()>;
    /// Attach an embedding vector to a previously inserted chunk.
    fn store_embedding(&self, chunk_id: &str, embedding: &[f32]) -> PetrelResult<()>;

    // --- Query ---
    /// Brute-force cosine search over all chunk embeddings.
    fn search_vector(&self, embedding: &[f32], top_k: usize) -> PetrelResult<Vec<SemanticHit>>;
    /// Edges where `entity` is the source, newest first.
    fn neighbors(&self, entity: &str, limit: usize) -> PetrelResult<Vec<GraphEdge>>;

    // --- Aggregation ---
    fn edge_count(&self) -> PetrelResult<usize>;
    fn chunk_count(&self) -> PetrelResult<usize>;
}
