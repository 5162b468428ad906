use serde::{Deserialize, Serialize};

/// One relation edge from the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source entity label.
    pub source: String,
    /// Relation kind, e.g. "degrades" or "improves_stability".
    pub relation: String,
    /// Target entity label.
    pub target: String,
    /// Paper the edge was extracted from.
    pub paper: String,
    /// Sentence the edge was extracted from.
    #[serde(default)]
    pub sentence: String,
    /// Extraction confidence in [0, 1].
    pub confidence: f64,
}

impl GraphEdge {
    /// Identity used for deduplication across seeds.
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.source.clone(),
            self.relation.clone(),
            self.target.clone(),
        )
    }

    /// Human-readable "source relation target" form.
    pub fn statement(&self) -> String {
        format!("{} {} {}", self.source, self.relation, self.target)
            .trim()
            .to_string()
    }
}
