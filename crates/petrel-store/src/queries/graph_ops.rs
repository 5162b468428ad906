//! Knowledge graph queries: node upserts, edge inserts, neighbor lookups.

use rusqlite::{params, Connection};

use petrel_core::errors::PetrelResult;
use petrel_core::models::GraphEdge;

use crate::to_store_err;

/// Classify an entity label into a node type.
pub fn infer_node_type(label: &str) -> &'static str {
    let lower = label.to_lowercase();
    if lower.ends_with("ase") {
        return "enzyme";
    }
    if lower.starts_with("ph") || lower.contains("°c") || lower.contains(" c") {
        return "condition";
    }
    if lower.contains('%') || lower.contains("degrad") || lower.contains("conversion") {
        return "metric";
    }
    if matches!(lower.as_str(), "pet" | "mhet" | "bhet" | "tpa") {
        return "substrate";
    }
    "entity"
}

/// Insert a node if absent, returning its id either way.
pub fn upsert_node(conn: &Connection, label: &str) -> PetrelResult<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO nodes (label, type) VALUES (?1, ?2)",
        params![label, infer_node_type(label)],
    )
    .map_err(|e| to_store_err(format!("upsert_node insert: {e}")))?;

    conn.query_row(
        "SELECT id FROM nodes WHERE label = ?1",
        params![label],
        |row| row.get(0),
    )
    .map_err(|e| to_store_err(format!("upsert_node lookup: {e}")))
}

/// Insert an edge, creating its endpoint nodes as needed.
/// Exact duplicates (same source, relation, target, paper) are ignored.
/// Returns whether a row was actually written.
pub fn insert_edge(conn: &Connection, edge: &GraphEdge) -> PetrelResult<bool> {
    let source_id = upsert_node(conn, &edge.source)?;
    let target_id = upsert_node(conn, &edge.target)?;

    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO edges
                (source_id, relation, target_id, paper, sentence, confidence)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                source_id,
                edge.relation,
                target_id,
                edge.paper,
                edge.sentence,
                edge.confidence
            ],
        )
        .map_err(|e| to_store_err(format!("insert_edge: {e}")))?;
    Ok(changed > 0)
}

/// Edges where `entity` is the source, newest first.
pub fn fetch_neighbors(
    conn: &Connection,
    entity: &str,
    limit: usize,
) -> PetrelResult<Vec<GraphEdge>> {
    let mut stmt = conn
        .prepare(
            "SELECT n1.label, e.relation, n2.label, e.paper, e.sentence, e.confidence
             FROM edges e
             JOIN nodes n1 ON e.source_id = n1.id
             JOIN nodes n2 ON e.target_id = n2.id
             WHERE n1.label = ?1
             ORDER BY e.id DESC
             LIMIT ?2",
        )
        .map_err(|e| to_store_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![entity, limit as i64], |row| {
            Ok(GraphEdge {
                source: row.get(0)?,
                relation: row.get(1)?,
                target: row.get(2)?,
                paper: row.get(3)?,
                sentence: row.get(4)?,
                confidence: row.get(5)?,
            })
        })
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut edges = Vec::new();
    for row in rows {
        edges.push(row.map_err(|e| to_store_err(e.to_string()))?);
    }
    Ok(edges)
}

/// Total number of edges.
pub fn edge_count(conn: &Connection) -> PetrelResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(count as usize)
}
