//! The episode driver: policy loop, post-episode augmentation, answer
//! composition, and run logging.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use petrel_core::constants::AUGMENT_NEIGHBOR_LIMIT;
use petrel_core::errors::{AgentError, PetrelResult};
use petrel_core::models::{Action, AgentState, EpisodeMetrics, EpisodeReport, TrajectoryStep};
use petrel_core::traits::{IGenerator, IPolicy};
use petrel_retrieval::{aliases, EventLog, RetrievalBackend, RetrievalRuntime};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::answer::{compose_answer, AnswerContext};
use crate::env::RetrievalEnvironment;

/// File name of the per-run trajectory log, relative to the log
/// directory.
pub const RUNS_LOG: &str = "rl_agent_runs.jsonl";

/// One policy-driven agent over a shared retrieval backend.
///
/// The agent owns its environment and policy, so each concurrent
/// episode needs its own `Agent`; the backend behind them is shared.
pub struct Agent {
    env: RetrievalEnvironment,
    policy: Box<dyn IPolicy>,
    generator: Option<Box<dyn IGenerator>>,
    answer_ctx: AnswerContext,
    runs_log: EventLog,
}

impl Agent {
    pub fn new(
        backend: Arc<RetrievalBackend>,
        policy: Box<dyn IPolicy>,
        generator: Option<Box<dyn IGenerator>>,
        answer_ctx: AnswerContext,
        runs_log: EventLog,
        max_steps: u32,
    ) -> Self {
        Self {
            env: RetrievalEnvironment::new(backend, max_steps),
            policy,
            generator,
            answer_ctx,
            runs_log,
        }
    }

    /// Build an agent over the shared runtime, resolving the answer
    /// corpus and the run log from its configuration.
    pub fn from_runtime(
        runtime: &RetrievalRuntime,
        policy: Box<dyn IPolicy>,
        generator: Option<Box<dyn IGenerator>>,
    ) -> Self {
        let answer_ctx = AnswerContext::load(&runtime.config.store);
        let log_path = Path::new(&runtime.config.observability.log_dir).join(RUNS_LOG);
        let runs_log = match EventLog::open(&log_path) {
            Ok(log) => log,
            Err(e) => {
                warn!(error = %e, "run log unavailable; trajectories will not be recorded");
                EventLog::disabled()
            }
        };
        Self::new(
            runtime.backend.clone(),
            policy,
            generator,
            answer_ctx,
            runs_log,
            runtime.config.agent.max_steps,
        )
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// Run one full episode: loop the policy until the environment
    /// terminates, enrich the graph with any expected entities the
    /// episode missed, compose the answer, and log the run.
    pub fn run(&mut self, question: &str) -> PetrelResult<EpisodeReport> {
        let episode_id = Uuid::new_v4().to_string();
        self.env.reset(question);
        let mut trajectory: Vec<TrajectoryStep> = Vec::new();
        let mut rewards: Vec<f64> = Vec::new();

        loop {
            let action = {
                let state = self.env.state().ok_or(AgentError::NoActiveEpisode)?;
                self.policy.select(state)?
            };
            let outcome = self.env.step(action)?;
            let context_size = self.env.state().map_or(0, |s| s.context.len());
            debug!(action = %action, info = %outcome.info, reward = outcome.reward, "step");
            trajectory.push(TrajectoryStep {
                action,
                info: outcome.info,
                context_size,
            });
            rewards.push(outcome.reward);
            // A summary ends the episode even when the environment has
            // steps left.
            if action == Action::Summarize || outcome.done {
                break;
            }
        }

        let mut state = self.env.take_state().ok_or(AgentError::NoActiveEpisode)?;
        let expected = aliases::expected_entities(question);
        if !expected.is_empty() {
            augment_with_expected_entities(&mut state, self.env.backend(), &expected);
        }

        let composed = compose_answer(
            &state,
            question,
            self.generator.as_deref(),
            &self.answer_ctx,
        )?;
        let metrics = compute_metrics(&state, &rewards);
        let use_llm = self.generator.is_some();

        self.runs_log.append_raw(json!({
            "episode_id": &episode_id,
            "question": question,
            "steps": &trajectory,
            "answer": &composed.text,
            "rewards": &rewards,
        }));
        self.env.backend().events().append(json!({
            "event": "rl_agent_run",
            "episode_id": &episode_id,
            "question": question,
            "trajectory": &trajectory,
            "answer": &composed.text,
            "use_llm": use_llm,
            "metrics": &metrics,
        }));
        info!(
            episode = %episode_id,
            steps = trajectory.len(),
            policy = self.policy.name(),
            "episode finished"
        );

        Ok(EpisodeReport {
            episode_id,
            question: question.to_string(),
            answer: composed.text,
            citations: composed.citations,
            metrics,
            trajectory,
            rewards,
            use_llm,
        })
    }
}

/// Pull neighbors for expected entities the episode never touched,
/// prepending their edges so the answer leads with them.
pub fn augment_with_expected_entities(
    state: &mut AgentState,
    backend: &RetrievalBackend,
    expected: &[String],
) {
    let mut present: HashSet<String> = HashSet::new();
    for hit in &state.context {
        if let Some(source) = hit.source() {
            if !source.is_empty() {
                present.insert(source.to_string());
            }
        }
    }
    for edge in &state.graph_nodes {
        if !edge.source.is_empty() {
            present.insert(edge.source.clone());
        }
    }

    for entity in expected {
        if present.contains(entity) {
            continue;
        }
        let edges = match backend.graph_neighbors(entity, AUGMENT_NEIGHBOR_LIMIT) {
            Ok(edges) => edges,
            Err(e) => {
                warn!(entity = %entity, error = %e, "neighbor fetch for expected entity failed");
                continue;
            }
        };
        if edges.is_empty() {
            continue;
        }
        for edge in &edges {
            present.insert(edge.source.clone());
        }
        let mut combined = edges;
        combined.append(&mut state.graph_nodes);
        state.graph_nodes = combined;
    }
}

/// Aggregate metrics for a finished episode.
pub fn compute_metrics(state: &AgentState, rewards: &[f64]) -> EpisodeMetrics {
    EpisodeMetrics {
        semantic_avg: mean(state.context.iter().map(|hit| hit.score)),
        graph_confidence_avg: mean(state.graph_nodes.iter().map(|edge| edge.confidence)),
        reward_sum: if rewards.is_empty() {
            None
        } else {
            Some(rewards.iter().sum())
        },
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}
