use crate::errors::PetrelResult;
use crate::models::{Action, AgentState};

/// Action selection strategy for the retrieval agent.
///
/// Policies read the episode state (usually through its observation)
/// and never mutate it; stochastic policies carry their own RNG behind
/// interior mutability.
pub trait IPolicy: Send + Sync + std::fmt::Debug {
    /// Human-readable policy name, used in logs and benchmark rows.
    fn name(&self) -> &str;

    /// Choose the next action for the given state.
    fn select(&self, state: &AgentState) -> PetrelResult<Action>;
}
