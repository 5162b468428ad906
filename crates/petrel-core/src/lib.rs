//! # petrel-core
//!
//! Foundation crate for the Petrel retrieval agent.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::PetrelConfig;
pub use errors::{PetrelError, PetrelResult};
pub use models::{Action, AgentState, GraphEdge, Observation, SemanticHit};
