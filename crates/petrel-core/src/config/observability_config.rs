use serde::{Deserialize, Serialize};

use super::defaults;

/// Logging and event sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Directory for JSONL event and trajectory logs.
    pub log_dir: String,
    /// Default log level when PETREL_LOG is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_dir: defaults::DEFAULT_LOG_DIR.to_string(),
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
