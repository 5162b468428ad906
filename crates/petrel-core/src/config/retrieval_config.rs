use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Hits returned by a semantic search.
    pub vector_top_k: usize,
    /// Edges returned by a graph expansion.
    pub graph_top_k: usize,
    /// Edges fetched per seed entity during diverse expansion.
    pub per_seed_limit: usize,
    /// Expand queries with domain alias vocabulary before embedding.
    pub alias_expansion: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            vector_top_k: defaults::DEFAULT_VECTOR_TOP_K,
            graph_top_k: defaults::DEFAULT_GRAPH_TOP_K,
            per_seed_limit: defaults::DEFAULT_PER_SEED_LIMIT,
            alias_expansion: defaults::DEFAULT_ALIAS_EXPANSION,
        }
    }
}
