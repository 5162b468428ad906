use serde::{Deserialize, Serialize};

use crate::models::Action;

/// One recorded step of an episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryStep {
    /// Action the policy chose.
    pub action: Action,
    /// Diagnostic tag produced by the environment for this step.
    pub info: String,
    /// Context size after the step.
    pub context_size: usize,
}

/// Aggregate quality metrics for a finished episode.
///
/// Each field is absent rather than zero when there is nothing to
/// average, so benchmark consumers can tell "no evidence" apart from
/// "evidence scored zero".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    /// Mean semantic score over the gathered context.
    pub semantic_avg: Option<f64>,
    /// Mean extraction confidence over the gathered edges.
    pub graph_confidence_avg: Option<f64>,
    /// Total shaped reward; absent when no steps were taken.
    pub reward_sum: Option<f64>,
}

/// A numbered citation attached to an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based citation number as it appears in the answer.
    pub id: usize,
    /// Paper filename the evidence came from.
    pub paper: String,
    /// Resolved human-readable title, or the paper stem.
    pub title: String,
}

/// Full result of one agent run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Unique id of this run, shared with its log rows.
    pub episode_id: String,
    /// Question that drove the episode.
    pub question: String,
    /// Composed answer with sources footer.
    pub answer: String,
    /// Citations referenced by the answer.
    pub citations: Vec<Citation>,
    /// Aggregate metrics.
    pub metrics: EpisodeMetrics,
    /// Per-step records; same length as `rewards`.
    pub trajectory: Vec<TrajectoryStep>,
    /// Per-step shaped rewards; same length as `trajectory`.
    pub rewards: Vec<f64>,
    /// Whether the answer came from the generation backend.
    pub use_llm: bool,
}
