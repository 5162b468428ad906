//! The reward-shaped retrieval agent.
//!
//! An episode starts from a research question and walks a small action
//! space over the hybrid retrieval backend: semantic search, graph
//! expansion, summarize, stop. The [`env`] module owns the state
//! machine and reward accounting, [`policy`] the action selection
//! strategies, [`driver`] the episode loop and answer pipeline, and
//! [`eval`] the coverage benchmark over a question/keyword dataset.

pub mod answer;
pub mod driver;
pub mod env;
pub mod eval;
pub mod policy;

pub use answer::AnswerContext;
pub use driver::Agent;
pub use env::{RetrievalEnvironment, StepOutcome};
pub use policy::load_policy;
