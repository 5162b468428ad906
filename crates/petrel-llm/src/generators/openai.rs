//! OpenAI-compatible chat completion backend.
//!
//! Single-attempt: remote APIs do their own load shedding, so the
//! retry policy lives with the local backend only. The API key is read
//! from the environment at call time, never stored.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use petrel_core::config::GenerationConfig;
use petrel_core::errors::{GenerationError, PetrelResult};
use petrel_core::traits::IGenerator;

const SYSTEM_PROMPT: &str = "You are a helpful PETase research assistant.";

#[derive(Debug)]
pub struct OpenAiGenerator {
    api_base: String,
    key_env: String,
    model: String,
    temperature: f64,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiGenerator {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            api_base: config.openai_api_base.trim_end_matches('/').to_string(),
            key_env: config.openai_key_env.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn api_key(&self) -> PetrelResult<String> {
        std::env::var(&self.key_env).map_err(|_| {
            GenerationError::MissingApiKey {
                var: self.key_env.clone(),
            }
            .into()
        })
    }
}

impl IGenerator for OpenAiGenerator {
    fn generate(&self, prompt: &str) -> PetrelResult<String> {
        let api_key = self.api_key()?;
        let url = format!("{}/chat/completions", self.api_base);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };
        let response = reqwest::blocking::Client::new()
            .post(&url)
            .bearer_auth(&api_key)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .map_err(|e| GenerationError::RequestFailed {
                message: format!("OpenAI request failed: {e}"),
            })?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::RequestFailed {
                message: format!("OpenAI error {status}: {body}"),
            }
            .into());
        }
        let parsed: ChatResponse = response.json().map_err(|e| GenerationError::RequestFailed {
            message: format!("OpenAI JSON parse error: {e}"),
        })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::RequestFailed {
                message: "OpenAI response had no choices".to_string(),
            })?;
        debug!(model = %self.model, chars = content.len(), "chat completion received");
        Ok(content.trim().to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        std::env::var(&self.key_env).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrel_core::errors::PetrelError;

    fn config_with_unset_key() -> GenerationConfig {
        GenerationConfig {
            backend: "openai".to_string(),
            openai_key_env: "PETREL_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn generate_fails_fast_without_api_key() {
        let generator = OpenAiGenerator::new(&config_with_unset_key());
        let err = generator.generate("summarize this").unwrap_err();
        assert!(matches!(
            err,
            PetrelError::GenerationError(GenerationError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn missing_key_means_unavailable() {
        let generator = OpenAiGenerator::new(&config_with_unset_key());
        assert!(!generator.is_available());
    }

    #[test]
    fn api_base_trailing_slashes_are_trimmed() {
        let config = GenerationConfig {
            openai_api_base: "https://api.example.com/v1///".to_string(),
            ..config_with_unset_key()
        };
        let generator = OpenAiGenerator::new(&config);
        assert_eq!(generator.api_base, "https://api.example.com/v1");
    }
}
