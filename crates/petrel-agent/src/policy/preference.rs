use petrel_core::config::PolicyConfig;
use petrel_core::errors::PetrelResult;
use petrel_core::models::{Action, AgentState};
use petrel_core::traits::IPolicy;

/// Observation progress below which the episode counts as young.
const MID_EPISODE: f32 = 0.5;

/// Threshold rules distilled from preference-ranked trajectories.
///
/// Works on the normalized observation rather than the raw state, so
/// its thresholds line up with what a trained policy sees. Rule order
/// matters: fill context, then the graph, keep expanding through the
/// young half of the episode, then summarize. A late episode with any
/// evidence in hand is stopped regardless of what the rules picked.
#[derive(Debug)]
pub struct PreferencePolicy {
    vector_threshold: f32,
    graph_threshold: f32,
    stop_threshold: f32,
}

impl PreferencePolicy {
    pub fn new(vector_threshold: f32, graph_threshold: f32, stop_threshold: f32) -> Self {
        Self {
            vector_threshold,
            graph_threshold,
            stop_threshold,
        }
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(
            config.vector_threshold,
            config.graph_threshold,
            config.stop_threshold,
        )
    }
}

impl IPolicy for PreferencePolicy {
    fn name(&self) -> &str {
        "preference"
    }

    fn select(&self, state: &AgentState) -> PetrelResult<Action> {
        let obs = state.observation();
        let mut action = if obs.context < self.vector_threshold {
            Action::VectorSearch
        } else if obs.graph < self.graph_threshold || obs.steps < MID_EPISODE {
            Action::GraphExpand
        } else {
            Action::Summarize
        };
        if obs.steps >= self.stop_threshold && obs.context > 0.0 {
            action = Action::Stop;
        }
        Ok(action)
    }
}
