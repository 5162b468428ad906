use serde::{Deserialize, Serialize};

use super::defaults;

/// Agent episode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Episode ends after this many steps regardless of policy.
    pub max_steps: u32,
    /// Compose answers with the generation backend when reachable.
    pub use_llm: bool,
    /// RNG seed for stochastic policy sampling.
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: defaults::DEFAULT_MAX_STEPS,
            use_llm: defaults::DEFAULT_USE_LLM,
            seed: defaults::DEFAULT_SEED,
        }
    }
}
