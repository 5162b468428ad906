//! Chunk corpus queries: chunk inserts, embedding storage, counts.

use rusqlite::{params, Connection};

use petrel_core::errors::PetrelResult;

use crate::to_store_err;

/// Insert or replace a chunk with its metadata.
pub fn insert_chunk(
    conn: &Connection,
    chunk_id: &str,
    text: &str,
    metadata: &serde_json::Map<String, serde_json::Value>,
) -> PetrelResult<()> {
    let metadata_json = serde_json::to_string(metadata)?;
    conn.execute(
        "INSERT INTO chunks (chunk_id, text, metadata)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(chunk_id) DO UPDATE SET
            text = excluded.text,
            metadata = excluded.metadata",
        params![chunk_id, text, metadata_json],
    )
    .map_err(|e| to_store_err(format!("insert_chunk: {e}")))?;
    Ok(())
}

/// Attach an embedding to a chunk, replacing any previous vector.
pub fn store_embedding(conn: &Connection, chunk_id: &str, embedding: &[f32]) -> PetrelResult<()> {
    let blob = f32_vec_to_bytes(embedding);
    let dims = embedding.len() as i64;
    conn.execute(
        "INSERT INTO chunk_embeddings (chunk_id, embedding, dimensions)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(chunk_id) DO UPDATE SET
            embedding = excluded.embedding,
            dimensions = excluded.dimensions",
        params![chunk_id, blob, dims],
    )
    .map_err(|e| to_store_err(format!("store_embedding: {e}")))?;
    Ok(())
}

/// Total number of chunks.
pub fn chunk_count(conn: &Connection) -> PetrelResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(count as usize)
}

/// Convert f32 slice to bytes (little-endian).
pub(crate) fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to f32 vec.
pub(crate) fn bytes_to_f32_vec(bytes: &[u8], expected_dims: usize) -> Vec<f32> {
    let mut result = Vec::with_capacity(expected_dims);
    for chunk in bytes.chunks_exact(4) {
        result.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_blob_roundtrip() {
        let v = vec![0.5_f32, -1.25, 3.75];
        let bytes = f32_vec_to_bytes(&v);
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes_to_f32_vec(&bytes, 3), v);
    }
}
