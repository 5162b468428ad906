use serde::{Deserialize, Serialize};

use super::defaults;

/// Policy selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Policy kind: "heuristic", "preference", or "checkpoint".
    pub kind: String,
    /// Path to a trained checkpoint; required for the "checkpoint" kind.
    pub checkpoint_path: Option<String>,
    /// Context observation below this value triggers semantic search.
    pub vector_threshold: f32,
    /// Graph observation below this value triggers graph expansion.
    pub graph_threshold: f32,
    /// Step observation at or above this value forces a stop.
    pub stop_threshold: f32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            kind: defaults::DEFAULT_POLICY_KIND.to_string(),
            checkpoint_path: None,
            vector_threshold: defaults::DEFAULT_VECTOR_THRESHOLD,
            graph_threshold: defaults::DEFAULT_GRAPH_THRESHOLD,
            stop_threshold: defaults::DEFAULT_STOP_THRESHOLD,
        }
    }
}
