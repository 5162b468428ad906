//! Episode state machine and reward accounting.
//!
//! `step` applies one action against the retrieval backend, mutates the
//! episode state, and returns the shaped reward. Reward values live in
//! [`petrel_core::constants`] so benchmark sums stay comparable across
//! builds. A backend failure inside a step is logged and scored as an
//! empty result; it never aborts the episode.

use std::sync::Arc;

use petrel_core::constants::{
    GRAPH_HIT_REWARD, GRAPH_MISS_PENALTY, GRAPH_NO_CONTEXT_PENALTY, STEP_PENALTY,
    STOP_EMPTY_PENALTY, STOP_WITH_EVIDENCE_REWARD, SUMMARIZE_EMPTY_PENALTY, SUMMARIZE_REWARD,
    VECTOR_HIT_REWARD, VECTOR_MISS_PENALTY,
};
use petrel_core::errors::{AgentError, PetrelResult};
use petrel_core::models::{Action, AgentState};
use petrel_retrieval::aliases;
use petrel_retrieval::RetrievalBackend;
use tracing::warn;

/// Result of one environment step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Shaped reward for the step, step penalty included.
    pub reward: f64,
    /// Whether the episode terminated on this step.
    pub done: bool,
    /// Diagnostic tag describing what the action did.
    pub info: String,
}

/// The agent's environment: one episode at a time over a shared
/// retrieval backend.
///
/// The backend is read-only, so any number of environments can share
/// one instance across threads; each environment owns its own episode
/// state.
pub struct RetrievalEnvironment {
    backend: Arc<RetrievalBackend>,
    max_steps: u32,
    state: Option<AgentState>,
}

impl RetrievalEnvironment {
    pub fn new(backend: Arc<RetrievalBackend>, max_steps: u32) -> Self {
        Self {
            backend,
            max_steps,
            state: None,
        }
    }

    /// Start a new episode for `question`, discarding any previous
    /// state.
    pub fn reset(&mut self, question: &str) -> &AgentState {
        self.state.insert(AgentState::new(question))
    }

    /// Live episode state, if an episode has been started.
    pub fn state(&self) -> Option<&AgentState> {
        self.state.as_ref()
    }

    /// Hand the finished state to the caller, leaving the environment
    /// without an active episode.
    pub fn take_state(&mut self) -> Option<AgentState> {
        self.state.take()
    }

    pub fn backend(&self) -> &RetrievalBackend {
        &self.backend
    }

    /// Apply one action to the current episode.
    ///
    /// Every step costs the flat step penalty before the action's own
    /// reward or penalty is added. `Stop` terminates the episode, as
    /// does reaching the step cap; `Summarize` does not terminate here,
    /// the driver ends the episode after composing the answer. Stepping
    /// a finished episode is an error: episodes are not resumable.
    pub fn step(&mut self, action: Action) -> PetrelResult<StepOutcome> {
        let state = self.state.as_mut().ok_or(AgentError::NoActiveEpisode)?;
        if state.done {
            return Err(AgentError::EpisodeFinished.into());
        }

        state.steps += 1;
        let mut reward = STEP_PENALTY;
        let mut done = false;
        let info: String;

        match action {
            Action::VectorSearch => {
                let top_k = self.backend.config().vector_top_k;
                let hits = match self.backend.vector_search(&state.question, top_k) {
                    Ok(hits) => hits,
                    Err(e) => {
                        warn!(error = %e, "vector search failed; scoring as no hits");
                        Vec::new()
                    }
                };
                reward += if hits.is_empty() {
                    VECTOR_MISS_PENALTY
                } else {
                    VECTOR_HIT_REWARD
                };
                info = action.tag().to_string();
                state.context.extend(hits);
            }
            Action::GraphExpand => {
                if state.context.is_empty() {
                    // Nothing to seed the expansion with; penalized
                    // without touching the backend.
                    reward += GRAPH_NO_CONTEXT_PENALTY;
                    info = "graph_expand_failed".to_string();
                } else {
                    let sources = state.context_sources();
                    let seeds = aliases::preferred_sources(&sources, None);
                    let top_k = self.backend.config().graph_top_k;
                    let neighbors = match self.backend.graph_neighbors_diverse(&seeds, top_k) {
                        Ok(edges) => edges,
                        Err(e) => {
                            warn!(error = %e, "graph expansion failed; scoring as no edges");
                            Vec::new()
                        }
                    };
                    reward += if neighbors.is_empty() {
                        GRAPH_MISS_PENALTY
                    } else {
                        GRAPH_HIT_REWARD
                    };
                    let lead: Vec<&str> = seeds.iter().take(3).map(String::as_str).collect();
                    info = format!("graph_expand:{}", lead.join("/"));
                    state.graph_nodes.extend(neighbors);
                }
            }
            Action::Summarize => {
                if state.context.is_empty() {
                    reward += SUMMARIZE_EMPTY_PENALTY;
                    info = "summarize_empty".to_string();
                } else {
                    reward += SUMMARIZE_REWARD;
                    info = action.tag().to_string();
                }
            }
            Action::Stop => {
                done = true;
                reward += if state.context.is_empty() {
                    STOP_EMPTY_PENALTY
                } else {
                    STOP_WITH_EVIDENCE_REWARD
                };
                info = action.tag().to_string();
            }
        }

        if state.steps >= self.max_steps {
            done = true;
        }
        state.done = done;

        Ok(StepOutcome { reward, done, info })
    }
}
