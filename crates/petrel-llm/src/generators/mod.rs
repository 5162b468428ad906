//! Generator construction and backend dispatch.

mod ollama;
mod openai;

pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;

use petrel_core::config::GenerationConfig;
use petrel_core::errors::{GenerationError, PetrelResult};
use petrel_core::traits::IGenerator;

/// Build the generator named by the configuration.
pub fn create_generator(config: &GenerationConfig) -> PetrelResult<Box<dyn IGenerator>> {
    match config.backend.to_lowercase().as_str() {
        "ollama" => Ok(Box::new(OllamaGenerator::new(config))),
        "openai" | "azure-openai" => Ok(Box::new(OpenAiGenerator::new(config))),
        other => Err(GenerationError::UnsupportedBackend {
            backend: other.to_string(),
        }
        .into()),
    }
}
