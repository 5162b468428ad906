use thiserror::Error;

/// Errors raised by embedding providers.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("Embedding inference failed: {message}")]
    InferenceFailed { message: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding provider '{provider}' is unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },
}
