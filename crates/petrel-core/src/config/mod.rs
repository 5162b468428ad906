//! Configuration for the Petrel workspace.
//!
//! Every section deserializes with `#[serde(default)]`, so a partial
//! TOML file overrides only the keys it names and an empty file yields
//! the compiled defaults.

pub mod defaults;

mod agent_config;
mod embed_config;
mod generation_config;
mod observability_config;
mod policy_config;
mod retrieval_config;
mod store_config;

pub use agent_config::AgentConfig;
pub use embed_config::EmbedConfig;
pub use generation_config::GenerationConfig;
pub use observability_config::ObservabilityConfig;
pub use policy_config::PolicyConfig;
pub use retrieval_config::RetrievalConfig;
pub use store_config::StoreConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PetrelError, PetrelResult};

/// Top-level configuration aggregating all sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PetrelConfig {
    pub store: StoreConfig,
    pub embedding: EmbedConfig,
    pub retrieval: RetrievalConfig,
    pub agent: AgentConfig,
    pub generation: GenerationConfig,
    pub policy: PolicyConfig,
    pub observability: ObservabilityConfig,
}

impl PetrelConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> PetrelResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| PetrelError::ConfigError(format!("invalid TOML: {e}")))
    }

    /// Load configuration from a TOML file, falling back to defaults
    /// when the file does not exist.
    pub fn load(path: &Path) -> PetrelResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> PetrelResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PetrelError::ConfigError(format!("serialization failed: {e}")))
    }
}
