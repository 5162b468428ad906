//! Brute-force cosine similarity search over stored chunk embeddings.

use rusqlite::Connection;

use petrel_core::errors::PetrelResult;
use petrel_core::models::SemanticHit;

use super::chunk_ops::bytes_to_f32_vec;
use crate::to_store_err;

/// Search chunks by vector similarity against stored embeddings.
/// Returns hits ordered by similarity descending. The ranking itself is
/// the result; low or negative scores are still returned so callers see
/// the best available matches for sparse corpora.
pub fn search_vector(
    conn: &Connection,
    query_embedding: &[f32],
    top_k: usize,
) -> PetrelResult<Vec<SemanticHit>> {
    let query_norm_sq: f64 = query_embedding
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum();
    if query_norm_sq == 0.0 {
        return Ok(vec![]);
    }
    let query_len = query_embedding.len();

    let mut stmt = conn
        .prepare(
            "SELECT c.chunk_id, c.text, c.metadata, e.embedding, e.dimensions
             FROM chunk_embeddings e
             JOIN chunks c ON c.chunk_id = e.chunk_id",
        )
        .map_err(|e| to_store_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            let chunk_id: String = row.get(0)?;
            let text: String = row.get(1)?;
            let metadata_json: String = row.get(2)?;
            let blob: Vec<u8> = row.get(3)?;
            let dims: i64 = row.get(4)?;
            Ok((chunk_id, text, metadata_json, blob, dims))
        })
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut scored: Vec<SemanticHit> = Vec::new();
    for row in rows {
        let (chunk_id, text, metadata_json, blob, dims) =
            row.map_err(|e| to_store_err(e.to_string()))?;
        // Skip dimension mismatches without deserializing the full vector.
        if dims as usize != query_len {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob, dims as usize);
        let score = cosine_similarity(query_embedding, &stored);

        let mut metadata: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&metadata_json).unwrap_or_default();
        metadata
            .entry("chunk_id".to_string())
            .or_insert_with(|| serde_json::Value::String(chunk_id));

        scored.push(SemanticHit {
            text,
            score,
            metadata,
        });
    }

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_k);
    Ok(scored)
}

/// Cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    let norm_b: f64 = b
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
