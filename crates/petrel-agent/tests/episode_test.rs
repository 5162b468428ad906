//! Integration tests for the episode state machine and the driver,
//! over an in-memory evidence store.

use std::sync::Arc;

use petrel_agent::answer::AnswerContext;
use petrel_agent::driver::{augment_with_expected_entities, Agent};
use petrel_agent::env::RetrievalEnvironment;
use petrel_agent::policy::HeuristicPolicy;
use petrel_core::config::{EmbedConfig, RetrievalConfig};
use petrel_core::errors::{AgentError, PetrelError, PetrelResult, StoreError};
use petrel_core::models::{Action, AgentState, GraphEdge, SemanticHit};
use petrel_core::traits::{IEmbedder, IEvidenceStore};
use petrel_embed::EmbedEngine;
use petrel_retrieval::{EventLog, RetrievalBackend};
use petrel_store::StoreEngine;

fn edge(source: &str, relation: &str, target: &str, paper: &str) -> GraphEdge {
    GraphEdge {
        source: source.to_string(),
        relation: relation.to_string(),
        target: target.to_string(),
        paper: paper.to_string(),
        sentence: format!("{source} {relation} {target} in trials."),
        confidence: 0.7,
    }
}

fn put_chunk(store: &StoreEngine, chunk_id: &str, text: &str, triple: (&str, &str, &str)) {
    let embedder = EmbedEngine::new(&EmbedConfig::default());
    let mut metadata = serde_json::Map::new();
    for (key, value) in [
        ("source", triple.0),
        ("relation", triple.1),
        ("target", triple.2),
        ("paper", "yoshida2016.pdf"),
    ] {
        metadata.insert(
            key.to_string(),
            serde_json::Value::String(value.to_string()),
        );
    }
    store.insert_chunk(chunk_id, text, &metadata).unwrap();
    let embedding = embedder.embed(text).unwrap();
    store.store_embedding(chunk_id, &embedding).unwrap();
}

/// One chunk sourced from PETase, and PETase with two outgoing edges.
fn scenario_store() -> Arc<StoreEngine> {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    put_chunk(
        &store,
        "chunk-1",
        "PETase degrades PET. Evidence: PETase depolymerized PET film at 30 C.",
        ("PETase", "degrades", "PET"),
    );
    store
        .insert_edge(&edge("PETase", "degrades", "PET", "yoshida2016.pdf"))
        .unwrap();
    store
        .insert_edge(&edge(
            "PETase",
            "secreted_by",
            "Ideonella sakaiensis",
            "yoshida2016.pdf",
        ))
        .unwrap();
    store
}

fn backend_over(store: Arc<StoreEngine>, events: EventLog) -> Arc<RetrievalBackend> {
    Arc::new(RetrievalBackend::new(
        store,
        Box::new(EmbedEngine::new(&EmbedConfig::default())),
        events,
        RetrievalConfig::default(),
    ))
}

fn env_over(store: Arc<StoreEngine>) -> RetrievalEnvironment {
    RetrievalEnvironment::new(backend_over(store, EventLog::disabled()), 6)
}

fn assert_reward(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "reward {actual} != {expected}"
    );
}

// ═══════════════════════════════════════════════════════════════════
// REWARD ACCOUNTING
// ═══════════════════════════════════════════════════════════════════

#[test]
fn search_expand_stop_accumulates_the_expected_rewards() {
    let mut env = env_over(scenario_store());
    env.reset("How does PETase degrade PET?");

    let search = env.step(Action::VectorSearch).unwrap();
    assert_reward(search.reward, 0.19);
    assert!(!search.done);
    assert_eq!(search.info, "vector_search");

    let expand = env.step(Action::GraphExpand).unwrap();
    assert_reward(expand.reward, 0.14);
    assert!(!expand.done);
    assert_eq!(expand.info, "graph_expand:PETase/FAST-PETase/FastPETase");

    let stop = env.step(Action::Stop).unwrap();
    assert_reward(stop.reward, 0.29);
    assert!(stop.done);

    let state = env.state().unwrap();
    assert_eq!(state.context.len(), 1);
    assert_eq!(state.graph_nodes.len(), 2);
    assert_eq!(state.steps, 3);
    assert!(state.done);
}

#[test]
fn vector_search_misses_on_an_empty_store() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let mut env = env_over(store);
    env.reset("anything");

    let outcome = env.step(Action::VectorSearch).unwrap();
    assert_reward(outcome.reward, -0.11);
    assert!(env.state().unwrap().context.is_empty());
}

#[test]
fn graph_expand_without_context_never_touches_the_backend() {
    let dir = tempfile::tempdir().unwrap();
    let audit = dir.path().join("audit.jsonl");
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let backend = backend_over(store, EventLog::open(&audit).unwrap());
    let mut env = RetrievalEnvironment::new(backend, 6);
    env.reset("q");

    let outcome = env.step(Action::GraphExpand).unwrap();
    assert_reward(outcome.reward, -0.11);
    assert_eq!(outcome.info, "graph_expand_failed");
    // No query was issued, so the audit log stays empty.
    let content = std::fs::read_to_string(&audit).unwrap_or_default();
    assert!(content.is_empty());
}

#[test]
fn summarize_scores_by_evidence_and_does_not_terminate() {
    let mut env = env_over(scenario_store());
    env.reset("How does PETase degrade PET?");

    let empty = env.step(Action::Summarize).unwrap();
    assert_reward(empty.reward, -0.06);
    assert_eq!(empty.info, "summarize_empty");
    assert!(!empty.done);

    env.step(Action::VectorSearch).unwrap();
    let with_evidence = env.step(Action::Summarize).unwrap();
    assert_reward(with_evidence.reward, 0.24);
    assert_eq!(with_evidence.info, "summarize");
    assert!(!with_evidence.done);
}

#[test]
fn stop_on_an_empty_context_is_penalized() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let mut env = env_over(store);
    env.reset("q");

    let outcome = env.step(Action::Stop).unwrap();
    assert_reward(outcome.reward, -0.21);
    assert!(outcome.done);
}

// ═══════════════════════════════════════════════════════════════════
// EPISODE LIFECYCLE
// ═══════════════════════════════════════════════════════════════════

#[test]
fn episodes_are_not_resumable_but_reset_starts_fresh() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let mut env = env_over(store);
    env.reset("q");
    env.step(Action::Stop).unwrap();

    let err = env.step(Action::VectorSearch).unwrap_err();
    assert!(matches!(
        err,
        PetrelError::AgentError(AgentError::EpisodeFinished)
    ));

    env.reset("another question");
    let outcome = env.step(Action::VectorSearch).unwrap();
    assert_reward(outcome.reward, -0.11);
    assert_eq!(env.state().unwrap().steps, 1);
}

#[test]
fn stepping_without_a_reset_is_an_error() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let mut env = env_over(store);
    let err = env.step(Action::VectorSearch).unwrap_err();
    assert!(matches!(
        err,
        PetrelError::AgentError(AgentError::NoActiveEpisode)
    ));
}

#[test]
fn the_step_cap_terminates_the_episode() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let mut env = env_over(store);
    env.reset("q");

    for step in 1..=6u32 {
        let outcome = env.step(Action::VectorSearch).unwrap();
        assert_eq!(outcome.done, step == 6, "unexpected done at step {step}");
    }
    assert_eq!(env.state().unwrap().steps, 6);
    assert!(env.state().unwrap().done);
}

// ═══════════════════════════════════════════════════════════════════
// BACKEND FAILURE TOLERANCE
// ═══════════════════════════════════════════════════════════════════

/// Searches succeed with one canned hit; every graph read fails.
struct BrokenGraphStore;

impl IEvidenceStore for BrokenGraphStore {
    fn insert_edge(&self, _edge: &GraphEdge) -> PetrelResult<bool> {
        Ok(false)
    }

    fn insert_chunk(
        &self,
        _chunk_id: &str,
        _text: &str,
        _metadata: &serde_json::Map<String, serde_json::Value>,
    ) -> PetrelResult<()> {
        Ok(())
    }

    fn store_embedding(&self, _chunk_id: &str, _embedding: &[f32]) -> PetrelResult<()> {
        Ok(())
    }

    fn search_vector(
        &self,
        _embedding: &[f32],
        _top_k: usize,
    ) -> PetrelResult<Vec<SemanticHit>> {
        let mut metadata = serde_json::Map::new();
        metadata.insert(
            "source".to_string(),
            serde_json::Value::String("PETase".to_string()),
        );
        Ok(vec![SemanticHit {
            text: "PETase degrades PET".to_string(),
            score: 0.9,
            metadata,
        }])
    }

    fn neighbors(&self, _entity: &str, _limit: usize) -> PetrelResult<Vec<GraphEdge>> {
        Err(StoreError::SqliteError {
            message: "forced failure".to_string(),
        }
        .into())
    }

    fn edge_count(&self) -> PetrelResult<usize> {
        Ok(0)
    }

    fn chunk_count(&self) -> PetrelResult<usize> {
        Ok(0)
    }
}

#[test]
fn a_failing_graph_read_scores_as_an_empty_expansion() {
    let backend = Arc::new(RetrievalBackend::new(
        Arc::new(BrokenGraphStore),
        Box::new(EmbedEngine::new(&EmbedConfig::default())),
        EventLog::disabled(),
        RetrievalConfig::default(),
    ));
    let mut env = RetrievalEnvironment::new(backend, 6);
    env.reset("q");

    let search = env.step(Action::VectorSearch).unwrap();
    assert_reward(search.reward, 0.19);

    // The episode absorbs the store failure as a miss instead of
    // crashing.
    let expand = env.step(Action::GraphExpand).unwrap();
    assert_reward(expand.reward, -0.06);
    assert!(expand.info.starts_with("graph_expand:PETase"));
    assert!(env.state().unwrap().graph_nodes.is_empty());
}

// ═══════════════════════════════════════════════════════════════════
// DRIVER
// ═══════════════════════════════════════════════════════════════════

#[test]
fn heuristic_agent_runs_an_episode_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let audit_path = dir.path().join("retrieval_trajectories.jsonl");
    let runs_path = dir.path().join("rl_agent_runs.jsonl");
    let backend = backend_over(scenario_store(), EventLog::open(&audit_path).unwrap());
    let answer_ctx =
        AnswerContext::from_dirs(dir.path().join("text"), dir.path().join("metadata"));
    let mut agent = Agent::new(
        backend,
        Box::new(HeuristicPolicy),
        None,
        answer_ctx,
        EventLog::open(&runs_path).unwrap(),
        6,
    );

    // Search, expand until five edges accumulate, then summarize. The
    // question names PETase, so augmentation probes for the flagship
    // engineered variants afterwards and finds none in this store.
    let report = agent.run("How does PETase degrade PET film?").unwrap();

    let actions: Vec<Action> = report.trajectory.iter().map(|step| step.action).collect();
    assert_eq!(
        actions,
        vec![
            Action::VectorSearch,
            Action::GraphExpand,
            Action::GraphExpand,
            Action::GraphExpand,
            Action::Summarize,
        ]
    );
    assert_eq!(report.rewards.len(), report.trajectory.len());
    assert_reward(report.metrics.reward_sum.unwrap(), 0.85);
    assert!(report.metrics.semantic_avg.unwrap() > 0.0);
    assert_reward(report.metrics.graph_confidence_avg.unwrap(), 0.7);
    assert!(!report.use_llm);

    assert!(report.answer.contains("PETase degrades PET"));
    assert!(report
        .answer
        .contains("\n\nSources:\n[1] yoshida2016.pdf (yoshida2016.pdf)"));
    assert_eq!(report.citations.len(), 1);

    // One raw row in the run log, stamped and sharing the episode id.
    let runs = std::fs::read_to_string(&runs_path).unwrap();
    assert_eq!(runs.lines().count(), 1);
    let row: serde_json::Value = serde_json::from_str(runs.lines().next().unwrap()).unwrap();
    assert_eq!(row["episode_id"], report.episode_id.as_str());
    assert_eq!(row["question"], "How does PETase degrade PET film?");
    assert_eq!(row["steps"][0]["action"], "vector_search");
    assert_eq!(row["rewards"].as_array().unwrap().len(), 5);
    assert!(row["timestamp"].is_string());
    assert!(row.get("type").is_none());

    // The audit log carries the retrieval events plus the run event.
    let audit = std::fs::read_to_string(&audit_path).unwrap();
    let run_events: Vec<serde_json::Value> = audit
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .filter(|event: &serde_json::Value| event["event"] == "rl_agent_run")
        .collect();
    assert_eq!(run_events.len(), 1);
    assert_eq!(run_events[0]["type"], "retrieval");
    assert_eq!(run_events[0]["episode_id"], report.episode_id.as_str());
    assert_eq!(run_events[0]["use_llm"], false);
    assert_eq!(
        run_events[0]["trajectory"].as_array().unwrap().len(),
        5
    );
}

#[test]
fn empty_corpus_episode_reports_no_evidence() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let backend = backend_over(store, EventLog::disabled());
    let answer_ctx =
        AnswerContext::from_dirs(dir.path().join("text"), dir.path().join("metadata"));
    let mut agent = Agent::new(
        backend,
        Box::new(HeuristicPolicy),
        None,
        answer_ctx,
        EventLog::disabled(),
        6,
    );

    let report = agent.run("Which enzymes attack plastic films?").unwrap();
    assert_eq!(report.answer, "No evidence gathered.");
    assert!(report.citations.is_empty());
    assert_eq!(report.metrics.semantic_avg, None);
    assert_eq!(report.metrics.graph_confidence_avg, None);
    // Six vector searches, all misses.
    assert_reward(report.metrics.reward_sum.unwrap(), -0.66);
    assert_eq!(report.trajectory.len(), 6);
}

// ═══════════════════════════════════════════════════════════════════
// EXPECTED-ENTITY AUGMENTATION
// ═══════════════════════════════════════════════════════════════════

#[test]
fn augmentation_prepends_edges_for_missing_entities() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    store
        .insert_edge(&edge("FAST-PETase", "degrades", "PET", "lu2022.pdf"))
        .unwrap();
    let backend = backend_over(store, EventLog::disabled());

    let mut state = AgentState::new("q");
    state
        .graph_nodes
        .push(edge("PETase", "degrades", "PET", "yoshida2016.pdf"));

    let expected = vec!["FAST-PETase".to_string()];
    augment_with_expected_entities(&mut state, &backend, &expected);

    assert_eq!(state.graph_nodes.len(), 2);
    assert_eq!(state.graph_nodes[0].source, "FAST-PETase");
    assert_eq!(state.graph_nodes[1].source, "PETase");

    // A second pass finds the entity already present and changes
    // nothing.
    augment_with_expected_entities(&mut state, &backend, &expected);
    assert_eq!(state.graph_nodes.len(), 2);
}

#[test]
fn augmentation_skips_entities_already_cited_in_context() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    store
        .insert_edge(&edge("FAST-PETase", "degrades", "PET", "lu2022.pdf"))
        .unwrap();
    let backend = backend_over(store, EventLog::disabled());

    let mut state = AgentState::new("q");
    let mut metadata = serde_json::Map::new();
    metadata.insert(
        "source".to_string(),
        serde_json::Value::String("FAST-PETase".to_string()),
    );
    state.context.push(SemanticHit {
        text: "FAST-PETase degrades PET".to_string(),
        score: 0.9,
        metadata,
    });

    augment_with_expected_entities(&mut state, &backend, &["FAST-PETase".to_string()]);
    assert!(state.graph_nodes.is_empty());
}

#[test]
fn augmentation_ignores_entities_absent_from_the_graph() {
    let store = Arc::new(StoreEngine::open_in_memory().unwrap());
    let backend = backend_over(store, EventLog::disabled());

    let mut state = AgentState::new("q");
    augment_with_expected_entities(&mut state, &backend, &["HotPETase".to_string()]);
    assert!(state.graph_nodes.is_empty());
}
