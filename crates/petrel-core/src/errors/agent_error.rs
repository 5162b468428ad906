use thiserror::Error;

/// Errors raised by the agent environment and policies.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Invalid action index {index}; expected 0..=3")]
    InvalidAction { index: i64 },

    #[error("No active episode; call reset first")]
    NoActiveEpisode,

    #[error("Episode already finished; call reset to start a new one")]
    EpisodeFinished,

    #[error("Failed to load policy checkpoint from {path}: {reason}")]
    CheckpointLoadFailed { path: String, reason: String },
}
