/// Petrel system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// --- Reward accounting ---
// These values are load-bearing: benchmark runs compare policies by
// cumulative reward, so every conforming build must produce the same sums.

/// Flat penalty applied at the start of every step.
pub const STEP_PENALTY: f64 = -0.01;

/// Vector search that returns at least one hit.
pub const VECTOR_HIT_REWARD: f64 = 0.2;
/// Vector search that returns nothing.
pub const VECTOR_MISS_PENALTY: f64 = -0.1;

/// Graph expansion that returns at least one edge.
pub const GRAPH_HIT_REWARD: f64 = 0.15;
/// Graph expansion that returns nothing.
pub const GRAPH_MISS_PENALTY: f64 = -0.05;
/// Graph expansion attempted before any context exists.
pub const GRAPH_NO_CONTEXT_PENALTY: f64 = -0.1;

/// Summarize with evidence in hand.
pub const SUMMARIZE_REWARD: f64 = 0.25;
/// Summarize with nothing to summarize.
pub const SUMMARIZE_EMPTY_PENALTY: f64 = -0.05;

/// Stop after gathering evidence.
pub const STOP_WITH_EVIDENCE_REWARD: f64 = 0.3;
/// Stop with an empty context.
pub const STOP_EMPTY_PENALTY: f64 = -0.2;

// --- Observation normalization caps ---

/// Context entries beyond this count do not move the observation.
pub const OBS_CONTEXT_CAP: usize = 10;
/// Graph edges beyond this count do not move the observation.
pub const OBS_GRAPH_CAP: usize = 10;
/// Steps beyond this count do not move the observation.
pub const OBS_STEP_CAP: u32 = 6;

// --- Answer composition ---

/// Context entries considered when composing an answer.
pub const SUMMARY_CONTEXT_LIMIT: usize = 5;
/// Graph edges considered when composing an answer.
pub const SUMMARY_GRAPH_LIMIT: usize = 5;
/// Neighbor fetch size when pulling in an expected entity after the loop.
pub const AUGMENT_NEIGHBOR_LIMIT: usize = 5;
/// Characters of surrounding document text attached to an evidence snippet.
pub const EVIDENCE_WINDOW: usize = 600;
