use serde::{Deserialize, Serialize};

use super::defaults;

/// Answer generation backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Generation backend: "ollama" or "openai".
    pub backend: String,
    /// Model name passed to the backend.
    pub model: String,
    /// Ollama endpoint.
    pub ollama_url: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Attempts before giving up on a request.
    pub retries: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Reachability ping timeout in seconds.
    pub ping_timeout_secs: u64,
    /// OpenAI-compatible API base URL.
    pub openai_api_base: String,
    /// Environment variable holding the API key.
    pub openai_key_env: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: defaults::DEFAULT_GENERATION_BACKEND.to_string(),
            model: defaults::DEFAULT_GENERATION_MODEL.to_string(),
            ollama_url: defaults::DEFAULT_OLLAMA_URL.to_string(),
            temperature: defaults::DEFAULT_GENERATION_TEMPERATURE,
            retries: defaults::DEFAULT_GENERATION_RETRIES,
            timeout_secs: defaults::DEFAULT_GENERATION_TIMEOUT_SECS,
            ping_timeout_secs: defaults::DEFAULT_PING_TIMEOUT_SECS,
            openai_api_base: defaults::DEFAULT_OPENAI_API_BASE.to_string(),
            openai_key_env: defaults::DEFAULT_OPENAI_KEY_ENV.to_string(),
        }
    }
}
