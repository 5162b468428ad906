use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Embedding provider: "ollama" or "hashed-tfidf".
    pub provider: String,
    /// Embedding vector dimensions.
    pub dimensions: usize,
    /// In-memory embedding cache max entries.
    pub cache_size: u64,
    /// Ollama endpoint for the "ollama" provider.
    pub ollama_url: String,
    /// Ollama embedding model name.
    pub ollama_model: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBED_PROVIDER.to_string(),
            dimensions: defaults::DEFAULT_EMBED_DIMENSIONS,
            cache_size: defaults::DEFAULT_EMBED_CACHE_SIZE,
            ollama_url: defaults::DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: defaults::DEFAULT_OLLAMA_EMBED_MODEL.to_string(),
        }
    }
}
