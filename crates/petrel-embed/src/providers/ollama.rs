//! Ollama local embedding provider.
//!
//! Connects to a local Ollama instance for embedding generation.
//! Configurable model, health check on startup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use petrel_core::errors::{EmbedError, PetrelResult};
use petrel_core::traits::IEmbedder;

/// Ollama local embedding provider.
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimensions: usize,
    available: AtomicBool,
}

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    pub fn new(model: String, dimensions: usize, base_url: String) -> Self {
        Self {
            base_url,
            model,
            dimensions,
            available: AtomicBool::new(false), // Must pass health check first.
        }
    }

    /// Check if the Ollama server is reachable.
    pub fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let result = reqwest::blocking::Client::new()
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send();

        match result {
            Ok(resp) if resp.status().is_success() => {
                self.available.store(true, Ordering::Relaxed);
                debug!(model = %self.model, "Ollama health check passed");
                true
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "Ollama health check failed");
                self.available.store(false, Ordering::Relaxed);
                false
            }
            Err(e) => {
                warn!(error = %e, "Ollama unreachable");
                self.available.store(false, Ordering::Relaxed);
                false
            }
        }
    }

    fn request_embeddings(&self, texts: Vec<String>) -> PetrelResult<Vec<Vec<f32>>> {
        if !self.available.load(Ordering::Relaxed) {
            return Err(EmbedError::ProviderUnavailable {
                provider: self.name().to_string(),
                reason: "health check has not passed".to_string(),
            }
            .into());
        }

        let url = format!("{}/api/embed", self.base_url);
        let request = OllamaEmbedRequest {
            model: self.model.clone(),
            input: texts,
        };

        let response = reqwest::blocking::Client::new()
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| EmbedError::InferenceFailed {
                message: format!("Ollama HTTP error: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(EmbedError::InferenceFailed {
                message: format!("Ollama returned {status}: {body}"),
            }
            .into());
        }

        let resp: OllamaEmbedResponse =
            response.json().map_err(|e| EmbedError::InferenceFailed {
                message: format!("Ollama JSON parse error: {e}"),
            })?;

        // A model serving the wrong width would skew every cosine score
        // against the store, so reject it and let the engine fall back.
        if let Some(bad) = resp
            .embeddings
            .iter()
            .find(|v| v.len() != self.dimensions)
        {
            return Err(EmbedError::DimensionMismatch {
                expected: self.dimensions,
                actual: bad.len(),
            }
            .into());
        }

        Ok(resp.embeddings)
    }
}

impl IEmbedder for OllamaEmbedder {
    fn embed(&self, text: &str) -> PetrelResult<Vec<f32>> {
        let results = self.request_embeddings(vec![text.to_string()])?;
        results.into_iter().next().ok_or_else(|| {
            EmbedError::InferenceFailed {
                message: "empty Ollama response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> PetrelResult<Vec<Vec<f32>>> {
        self.request_embeddings(texts.to_vec())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}
