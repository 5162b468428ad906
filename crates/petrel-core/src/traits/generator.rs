use crate::errors::PetrelResult;

/// Text generation backend for answer composition.
pub trait IGenerator: Send + Sync + std::fmt::Debug {
    /// Generate a completion for the prompt.
    fn generate(&self, prompt: &str) -> PetrelResult<String>;

    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Whether the backend is currently reachable.
    fn is_available(&self) -> bool;
}
