//! Action selection policies.
//!
//! Three strategies ship: hand-written heuristic rules, a
//! preference-tuned threshold policy, and inference over a trained
//! checkpoint. [`load_policy`] picks one from configuration.

mod checkpoint;
mod heuristic;
mod preference;

pub use checkpoint::CheckpointPolicy;
pub use heuristic::HeuristicPolicy;
pub use preference::PreferencePolicy;

use std::path::Path;

use petrel_core::config::PolicyConfig;
use petrel_core::errors::{PetrelError, PetrelResult};
use petrel_core::traits::IPolicy;
use tracing::warn;

/// Build the configured policy.
///
/// The "checkpoint" kind without a path falls back to the heuristic
/// rules rather than failing: a missing checkpoint is the normal state
/// before any training has happened. A path that names an unreadable
/// or malformed checkpoint is an error.
pub fn load_policy(config: &PolicyConfig, seed: u64) -> PetrelResult<Box<dyn IPolicy>> {
    match config.kind.as_str() {
        "heuristic" => Ok(Box::new(HeuristicPolicy)),
        "preference" => Ok(Box::new(PreferencePolicy::from_config(config))),
        "checkpoint" => match config.checkpoint_path.as_deref() {
            Some(path) => Ok(Box::new(CheckpointPolicy::load(
                Path::new(path),
                true,
                seed,
            )?)),
            None => {
                warn!("checkpoint policy requested without a path; using heuristic rules");
                Ok(Box::new(HeuristicPolicy))
            }
        },
        other => Err(PetrelError::ConfigError(format!(
            "unknown policy kind {other:?}; expected heuristic, preference, or checkpoint"
        ))),
    }
}
