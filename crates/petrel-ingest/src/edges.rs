//! JSONL edge files: the interchange format between extraction runs
//! and the store.
//!
//! One JSON object per line, `{source, relation, target, paper,
//! sentence, confidence}`. Paper and sentence may be omitted;
//! confidence defaults to a neutral prior for hand-written rows.

use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use petrel_core::errors::PetrelResult;
use petrel_core::models::GraphEdge;
use petrel_core::traits::IEvidenceStore;

fn default_confidence() -> f64 {
    0.5
}

#[derive(Deserialize)]
struct EdgeRow {
    source: String,
    relation: String,
    target: String,
    #[serde(default)]
    paper: String,
    #[serde(default)]
    sentence: String,
    #[serde(default = "default_confidence")]
    confidence: f64,
}

impl From<EdgeRow> for GraphEdge {
    fn from(row: EdgeRow) -> Self {
        GraphEdge {
            source: row.source,
            relation: row.relation,
            target: row.target,
            paper: row.paper,
            sentence: row.sentence,
            confidence: row.confidence,
        }
    }
}

/// Load edges from a JSONL file. Blank lines are skipped; a malformed
/// line is an error.
pub fn load_edges(path: &Path) -> PetrelResult<Vec<GraphEdge>> {
    let content = std::fs::read_to_string(path)?;
    let mut edges = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: EdgeRow = serde_json::from_str(line)?;
        edges.push(row.into());
    }
    Ok(edges)
}

/// Write edges out as JSONL, one object per line.
pub fn write_edges_jsonl(path: &Path, edges: &[GraphEdge]) -> PetrelResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = std::fs::File::create(path)?;
    for edge in edges {
        serde_json::to_writer(&mut file, edge)?;
        file.write_all(b"\n")?;
    }
    Ok(())
}

/// Insert edges into the store, returning how many were new. Exact
/// duplicates already present are counted as skipped, not errors.
pub fn store_edges(store: &dyn IEvidenceStore, edges: &[GraphEdge]) -> PetrelResult<usize> {
    let mut inserted = 0;
    for edge in edges {
        if store.insert_edge(edge)? {
            inserted += 1;
        }
    }
    info!(
        inserted,
        skipped = edges.len() - inserted,
        "edges stored"
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrel_store::StoreEngine;

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            source: source.to_string(),
            relation: "degrades".to_string(),
            target: target.to_string(),
            paper: "yoshida2016.pdf".to_string(),
            sentence: "evidence sentence".to_string(),
            confidence: 0.7,
        }
    }

    #[test]
    fn jsonl_round_trip_preserves_edges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kg_edges.jsonl");
        let edges = vec![edge("PETase", "PET"), edge("MHETase", "MHET")];

        write_edges_jsonl(&path, &edges).unwrap();
        let loaded = load_edges(&path).unwrap();
        assert_eq!(loaded, edges);
    }

    #[test]
    fn load_skips_blank_lines_and_fills_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.jsonl");
        std::fs::write(
            &path,
            "\n{\"source\":\"PETase\",\"relation\":\"degrades\",\"target\":\"PET\"}\n\n",
        )
        .unwrap();

        let loaded = load_edges(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].paper, "");
        assert_eq!(loaded[0].sentence, "");
        assert_eq!(loaded[0].confidence, 0.5);
    }

    #[test]
    fn malformed_lines_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.jsonl");
        std::fs::write(&path, "{\"source\":\"PETase\"\n").unwrap();
        assert!(load_edges(&path).is_err());
    }

    #[test]
    fn store_edges_counts_only_new_rows() {
        let store = StoreEngine::open_in_memory().unwrap();
        let edges = vec![edge("PETase", "PET"), edge("PETase", "PET")];

        let inserted = store_edges(&store, &edges).unwrap();
        assert_eq!(inserted, 1);

        // A second pass over the same file is a no-op.
        let inserted = store_edges(&store, &edges).unwrap();
        assert_eq!(inserted, 0);
    }
}
