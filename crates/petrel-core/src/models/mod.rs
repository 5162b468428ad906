//! Data model shared across the workspace.

mod action;
mod agent_state;
mod graph_edge;
mod semantic_hit;
mod trajectory;

pub use action::Action;
pub use agent_state::{AgentState, Observation};
pub use graph_edge::GraphEdge;
pub use semantic_hit::SemanticHit;
pub use trajectory::{Citation, EpisodeMetrics, EpisodeReport, TrajectoryStep};
