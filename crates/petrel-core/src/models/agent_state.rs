use serde::{Deserialize, Serialize};

use crate::constants::{OBS_CONTEXT_CAP, OBS_GRAPH_CAP, OBS_STEP_CAP};
use crate::models::{GraphEdge, SemanticHit};

/// Mutable episode state carried between steps.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    /// Question driving the episode.
    pub question: String,
    /// Semantic hits accumulated so far.
    pub context: Vec<SemanticHit>,
    /// Graph edges accumulated so far.
    pub graph_nodes: Vec<GraphEdge>,
    /// Steps taken so far.
    pub steps: u32,
    /// Whether the episode has terminated.
    pub done: bool,
}

impl AgentState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    /// Normalized observation of the current state.
    pub fn observation(&self) -> Observation {
        Observation {
            context: self.context.len().min(OBS_CONTEXT_CAP) as f32 / OBS_CONTEXT_CAP as f32,
            graph: self.graph_nodes.len().min(OBS_GRAPH_CAP) as f32 / OBS_GRAPH_CAP as f32,
            steps: self.steps.min(OBS_STEP_CAP) as f32 / OBS_STEP_CAP as f32,
        }
    }

    /// Source entities of the accumulated context, in accumulation
    /// order and without deduplication.
    pub fn context_sources(&self) -> Vec<String> {
        self.context
            .iter()
            .filter_map(|hit| hit.source().map(str::to_string))
            .collect()
    }
}

/// Normalized view of the agent state, each component in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Context fill: entries capped at 10, divided by 10.
    pub context: f32,
    /// Graph fill: edges capped at 10, divided by 10.
    pub graph: f32,
    /// Episode progress: steps capped at 6, divided by 6.
    pub steps: f32,
}

impl Observation {
    /// Fixed-order vector form for model inputs.
    pub fn as_array(&self) -> [f32; 3] {
        [self.context, self.graph, self.steps]
    }
}
