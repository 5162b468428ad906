//! Embedding providers.

mod hashed_tfidf;
mod ollama;

pub use hashed_tfidf::HashedTfIdf;
pub use ollama::OllamaEmbedder;

use petrel_core::config::EmbedConfig;
use petrel_core::traits::IEmbedder;
use tracing::warn;

/// Create the primary provider named by the config.
///
/// An unknown provider name falls back to hashed TF-IDF rather than
/// failing, so a typo in the config still yields a working system.
pub fn create_provider(config: &EmbedConfig) -> Box<dyn IEmbedder> {
    match config.provider.as_str() {
        "ollama" => {
            let provider = OllamaEmbedder::new(
                config.ollama_model.clone(),
                config.dimensions,
                config.ollama_url.clone(),
            );
            provider.health_check();
            Box::new(provider)
        }
        "hashed-tfidf" => Box::new(HashedTfIdf::new(config.dimensions)),
        other => {
            warn!(provider = other, "unknown embedding provider, using hashed TF-IDF");
            Box::new(HashedTfIdf::new(config.dimensions))
        }
    }
}
