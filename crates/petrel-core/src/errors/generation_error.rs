use thiserror::Error;

/// Errors raised by answer generation backends.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation backend at {url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Generation request failed: {message}")]
    RequestFailed { message: String },

    #[error("Generation failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("API key environment variable '{var}' is not set")]
    MissingApiKey { var: String },

    #[error("Unsupported generation backend '{backend}'")]
    UnsupportedBackend { backend: String },
}
