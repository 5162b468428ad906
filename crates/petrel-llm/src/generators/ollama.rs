//! Local Ollama generation backend.
//!
//! Pings `/api/tags` before generating, then posts to `/api/generate`
//! with bounded retries. Generation requests can legitimately take
//! minutes on the larger local models, so the request timeout is far
//! looser than the ping timeout.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use petrel_core::config::GenerationConfig;
use petrel_core::errors::{GenerationError, PetrelResult};
use petrel_core::traits::IGenerator;

#[derive(Debug)]
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    temperature: f64,
    retries: u32,
    timeout: Duration,
    ping_timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaGenerator {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            base_url: config.ollama_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            retries: config.retries,
            timeout: Duration::from_secs(config.timeout_secs),
            ping_timeout: Duration::from_secs(config.ping_timeout_secs),
        }
    }

    /// Cheap liveness probe against `/api/tags`.
    fn ping(&self) -> PetrelResult<()> {
        let url = format!("{}/api/tags", self.base_url);
        let response = reqwest::blocking::Client::new()
            .get(&url)
            .timeout(self.ping_timeout)
            .send()
            .map_err(|e| GenerationError::Unreachable {
                url: self.base_url.clone(),
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(GenerationError::Unreachable {
                url: self.base_url.clone(),
                reason: format!("ping returned {}", response.status()),
            }
            .into());
        }
        Ok(())
    }

    /// One completion attempt. Failures come back as plain messages so
    /// the retry loop can record the last one.
    fn request_completion(&self, prompt: &str) -> Result<String, String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };
        let response = reqwest::blocking::Client::new()
            .post(&url)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .map_err(|e| format!("Ollama HTTP error: {e}"))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(format!("Ollama returned {status}: {body}"));
        }
        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| format!("Ollama JSON parse error: {e}"))?;
        Ok(parsed.response.trim().to_string())
    }
}

impl IGenerator for OllamaGenerator {
    fn generate(&self, prompt: &str) -> PetrelResult<String> {
        self.ping()?;
        let mut last_error = String::new();
        for attempt in 0..self.retries {
            match self.request_completion(prompt) {
                Ok(text) => {
                    debug!(model = %self.model, chars = text.len(), "Ollama generation complete");
                    return Ok(text);
                }
                Err(message) => {
                    warn!(attempt, error = %message, "Ollama generation attempt failed");
                    last_error = message;
                }
            }
            if attempt + 1 < self.retries {
                thread::sleep(Duration::from_secs(2 * (u64::from(attempt) + 1)));
            }
        }
        Err(GenerationError::RetriesExhausted {
            attempts: self.retries,
            last_error,
        }
        .into())
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.ping().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_copies_generation_settings() {
        let config = GenerationConfig {
            model: "llama3:8b".to_string(),
            temperature: 0.7,
            retries: 5,
            ..GenerationConfig::default()
        };
        let generator = OllamaGenerator::new(&config);
        assert_eq!(generator.name(), "llama3:8b");
        assert_eq!(generator.retries, 5);
        assert!((generator.temperature - 0.7).abs() < f64::EPSILON);
    }
}
