use thiserror::Error;

/// Errors raised by the retrieval backend.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Retrieval runtime not initialized; call runtime::initialize first")]
    NotInitialized,

    #[error("Retrieval runtime already initialized")]
    AlreadyInitialized,
}
