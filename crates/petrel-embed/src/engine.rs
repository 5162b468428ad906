//! EmbedEngine coordinates provider selection, fallback, and caching.
//! Implements `IEmbedder` so it can be used anywhere a provider is expected.

use tracing::{debug, info};

use petrel_core::config::EmbedConfig;
use petrel_core::errors::PetrelResult;
use petrel_core::traits::IEmbedder;

use crate::cache::EmbedCache;
use crate::providers::{self, HashedTfIdf};

/// The main embedding engine.
///
/// Tries the configured primary provider; when it is unavailable or a
/// call fails, falls back to hashed TF-IDF so embedding never hard-fails
/// for local corpora. Results are cached by content hash.
pub struct EmbedEngine {
    primary: Box<dyn IEmbedder>,
    fallback: HashedTfIdf,
    cache: EmbedCache,
    dimensions: usize,
}

impl EmbedEngine {
    /// Create a new engine from configuration.
    pub fn new(config: &EmbedConfig) -> Self {
        let primary = providers::create_provider(config);
        let fallback = HashedTfIdf::new(config.dimensions);
        let cache = EmbedCache::new(config.cache_size);

        info!(
            provider = primary.name(),
            dims = config.dimensions,
            "embedding engine initialized"
        );

        Self {
            primary,
            fallback,
            cache,
            dimensions: config.dimensions,
        }
    }

    fn embed_uncached(&self, text: &str) -> PetrelResult<Vec<f32>> {
        if self.primary.is_available() {
            match self.primary.embed(text) {
                Ok(vec) => return Ok(vec),
                Err(e) => {
                    debug!(provider = self.primary.name(), error = %e, "primary embed failed, falling back");
                }
            }
        }
        self.fallback.embed(text)
    }

    /// Name of the provider that would serve the next call.
    pub fn active_provider(&self) -> &str {
        if self.primary.is_available() {
            self.primary.name()
        } else {
            self.fallback.name()
        }
    }

    /// Number of cached embeddings.
    pub fn cached_entries(&self) -> u64 {
        self.cache.len()
    }
}

impl IEmbedder for EmbedEngine {
    fn embed(&self, text: &str) -> PetrelResult<Vec<f32>> {
        let key = EmbedCache::key_for(text);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let embedding = self.embed_uncached(text)?;
        self.cache.insert(key, embedding.clone());
        Ok(embedding)
    }

    fn embed_batch(&self, texts: &[String]) -> PetrelResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        self.primary.name()
    }

    fn is_available(&self) -> bool {
        true // Hashed TF-IDF is always there.
    }
}
