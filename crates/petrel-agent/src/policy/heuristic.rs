use petrel_core::errors::PetrelResult;
use petrel_core::models::{Action, AgentState};
use petrel_core::traits::IPolicy;

/// Edges to gather before the graph is considered filled.
const GRAPH_TARGET: usize = 5;
/// Steps after which the episode should wrap up with a summary.
const SUMMARIZE_AFTER: u32 = 3;

/// Hand-written baseline rules over the raw state.
///
/// Search until something is in context, expand until the graph holds
/// a handful of edges, then summarize once the episode is past its
/// opening steps.
#[derive(Debug)]
pub struct HeuristicPolicy;

impl IPolicy for HeuristicPolicy {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn select(&self, state: &AgentState) -> PetrelResult<Action> {
        if state.context.is_empty() {
            return Ok(Action::VectorSearch);
        }
        if state.graph_nodes.len() < GRAPH_TARGET {
            return Ok(Action::GraphExpand);
        }
        if state.steps >= SUMMARIZE_AFTER {
            return Ok(Action::Summarize);
        }
        Ok(Action::Stop)
    }
}
