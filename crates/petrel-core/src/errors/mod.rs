//! Error types for all Petrel subsystems.
//!
//! Each subsystem gets its own enum so callers can match on the failures
//! they can actually handle. `PetrelError` aggregates them for the
//! binary surface where only reporting matters.

mod agent_error;
mod embed_error;
mod generation_error;
mod retrieval_error;
mod store_error;

pub use agent_error::AgentError;
pub use embed_error::EmbedError;
pub use generation_error::GenerationError;
pub use retrieval_error::RetrievalError;
pub use store_error::StoreError;

use thiserror::Error;

/// Top-level error for the Petrel workspace.
#[derive(Debug, Error)]
pub enum PetrelError {
    #[error(transparent)]
    StoreError(#[from] StoreError),

    #[error(transparent)]
    EmbeddingError(#[from] EmbedError),

    #[error(transparent)]
    RetrievalError(#[from] RetrievalError),

    #[error(transparent)]
    AgentError(#[from] AgentError),

    #[error(transparent)]
    GenerationError(#[from] GenerationError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result alias used across the workspace.
pub type PetrelResult<T> = Result<T, PetrelError>;
