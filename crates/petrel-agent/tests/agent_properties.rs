//! Property tests for the episode state machine and policies.

use std::sync::Arc;

use petrel_agent::env::RetrievalEnvironment;
use petrel_agent::policy::PreferencePolicy;
use petrel_core::config::{EmbedConfig, PolicyConfig, RetrievalConfig};
use petrel_core::errors::{AgentError, PetrelError};
use petrel_core::models::{Action, AgentState, GraphEdge, SemanticHit};
use petrel_core::traits::IPolicy;
use petrel_embed::EmbedEngine;
use petrel_retrieval::{EventLog, RetrievalBackend};
use petrel_store::StoreEngine;
use proptest::prelude::*;

fn empty_env() -> RetrievalEnvironment {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let backend = Arc::new(RetrievalBackend::new(
        store,
        Box::new(EmbedEngine::new(&EmbedConfig::default())),
        EventLog::disabled(),
        RetrievalConfig::default(),
    ));
    RetrievalEnvironment::new(backend, 6)
}

fn state_with(context: usize, graph: usize, steps: u32) -> AgentState {
    let mut state = AgentState::new("q");
    state.context = (0..context)
        .map(|_| SemanticHit {
            text: "x".to_string(),
            score: 0.9,
            metadata: serde_json::Map::new(),
        })
        .collect();
    state.graph_nodes = (0..graph)
        .map(|n| GraphEdge {
            source: "PETase".to_string(),
            relation: "degrades".to_string(),
            target: format!("PET-{n}"),
            paper: "p.pdf".to_string(),
            sentence: String::new(),
            confidence: 0.8,
        })
        .collect();
    state.steps = steps;
    state
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop::sample::select(vec![
        Action::VectorSearch,
        Action::GraphExpand,
        Action::Summarize,
        Action::Stop,
    ])
}

proptest! {
    /// On an empty corpus every action is a miss, so the reward per
    /// step is fully determined by the action, steps count up one per
    /// step, the episode finishes exactly on Stop or the step cap, and
    /// a finished episode refuses every further step.
    #[test]
    fn prop_empty_corpus_reward_table_holds(
        actions in prop::collection::vec(action_strategy(), 1..12),
    ) {
        let mut env = empty_env();
        env.reset("some question");
        let mut taken = 0u32;
        let mut done = false;

        for action in actions {
            if done {
                let err = env.step(action).unwrap_err();
                prop_assert!(matches!(
                    err,
                    PetrelError::AgentError(AgentError::EpisodeFinished)
                ));
                continue;
            }
            let outcome = env.step(action).unwrap();
            taken += 1;
            let expected = match action {
                Action::VectorSearch => -0.11,
                Action::GraphExpand => -0.11,
                Action::Summarize => -0.06,
                Action::Stop => -0.21,
            };
            prop_assert!((outcome.reward - expected).abs() < 1e-9);

            let state = env.state().unwrap();
            prop_assert_eq!(state.steps, taken);
            prop_assert!(state.context.is_empty());
            prop_assert!(state.graph_nodes.is_empty());

            let should_finish = action == Action::Stop || taken >= 6;
            prop_assert_eq!(outcome.done, should_finish);
            done = outcome.done;
        }
    }

    /// Past the stop threshold, any evidence at all forces a stop no
    /// matter how full the graph is.
    #[test]
    fn prop_preference_policy_stops_late_episodes_with_evidence(
        context in 1..30usize,
        graph in 0..30usize,
        steps in 5..20u32,
    ) {
        let state = state_with(context, graph, steps);
        let action = PreferencePolicy::from_config(&PolicyConfig::default())
            .select(&state)
            .unwrap();
        prop_assert_eq!(action, Action::Stop);
    }
}
