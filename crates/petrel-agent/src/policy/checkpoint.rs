//! Inference over a trained policy checkpoint.
//!
//! Checkpoints are JSON: a list of dense layers, each a weight matrix
//! and a bias vector. Hidden layers use tanh, the final layer emits
//! one logit per action. Deterministic mode takes the argmax;
//! stochastic mode samples the softmax with a seeded RNG so runs stay
//! reproducible.

use std::path::Path;
use std::sync::Mutex;

use petrel_core::errors::{AgentError, PetrelResult};
use petrel_core::models::{Action, AgentState};
use petrel_core::traits::IPolicy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Observation width the network must accept.
const INPUT_DIM: usize = 3;

#[derive(Debug, Deserialize)]
struct LayerWeights {
    /// Row-major weight matrix, one row per output unit.
    weights: Vec<Vec<f32>>,
    biases: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct CheckpointFile {
    layers: Vec<LayerWeights>,
}

#[derive(Debug)]
pub struct CheckpointPolicy {
    layers: Vec<LayerWeights>,
    deterministic: bool,
    rng: Mutex<StdRng>,
}

impl CheckpointPolicy {
    /// Load a checkpoint and validate its layer dimensions.
    pub fn load(path: &Path, deterministic: bool, seed: u64) -> PetrelResult<Self> {
        let fail = |reason: String| AgentError::CheckpointLoadFailed {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let parsed: CheckpointFile =
            serde_json::from_str(&content).map_err(|e| fail(e.to_string()))?;
        validate(&parsed.layers).map_err(fail)?;
        Ok(Self {
            layers: parsed.layers,
            deterministic,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    /// Pick an action index for an observation vector.
    pub fn predict(&self, observation: &[f32], deterministic: bool) -> usize {
        let logits = self.forward(observation);
        if deterministic {
            argmax(&logits)
        } else {
            let mut rng = match self.rng.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            sample_softmax(&logits, &mut rng)
        }
    }

    fn forward(&self, observation: &[f32]) -> Vec<f32> {
        let mut activations = observation.to_vec();
        let last = self.layers.len() - 1;
        for (depth, layer) in self.layers.iter().enumerate() {
            let mut next = Vec::with_capacity(layer.biases.len());
            for (row, bias) in layer.weights.iter().zip(&layer.biases) {
                let mut sum = *bias;
                for (weight, input) in row.iter().zip(&activations) {
                    sum += weight * input;
                }
                next.push(if depth == last { sum } else { sum.tanh() });
            }
            activations = next;
        }
        activations
    }
}

impl IPolicy for CheckpointPolicy {
    fn name(&self) -> &str {
        "checkpoint"
    }

    fn select(&self, state: &AgentState) -> PetrelResult<Action> {
        let index = self.predict(&state.observation().as_array(), self.deterministic);
        Action::from_index(index).ok_or_else(|| {
            AgentError::InvalidAction {
                index: index as i64,
            }
            .into()
        })
    }
}

fn validate(layers: &[LayerWeights]) -> Result<(), String> {
    if layers.is_empty() {
        return Err("checkpoint has no layers".to_string());
    }
    let mut width = INPUT_DIM;
    for (depth, layer) in layers.iter().enumerate() {
        if layer.weights.is_empty() {
            return Err(format!("layer {depth} has no weight rows"));
        }
        if layer.weights.len() != layer.biases.len() {
            return Err(format!(
                "layer {depth}: {} weight rows but {} biases",
                layer.weights.len(),
                layer.biases.len()
            ));
        }
        for row in &layer.weights {
            if row.len() != width {
                return Err(format!(
                    "layer {depth}: expected input width {width}, found {}",
                    row.len()
                ));
            }
        }
        width = layer.biases.len();
    }
    if width != Action::ALL.len() {
        return Err(format!(
            "final layer emits {width} logits, expected {}",
            Action::ALL.len()
        ));
    }
    Ok(())
}

fn argmax(logits: &[f32]) -> usize {
    let mut best = 0;
    for (index, value) in logits.iter().enumerate().skip(1) {
        if *value > logits[best] {
            best = index;
        }
    }
    best
}

fn sample_softmax(logits: &[f32], rng: &mut StdRng) -> usize {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let weights: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f32 = weights.iter().sum();
    let mut draw = rng.gen::<f32>() * total;
    for (index, weight) in weights.iter().enumerate() {
        draw -= weight;
        if draw <= 0.0 {
            return index;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrel_core::errors::PetrelError;
    use petrel_core::models::SemanticHit;
    use serde_json::json;
    use std::path::PathBuf;

    fn write_checkpoint(dir: &tempfile::TempDir, body: serde_json::Value) -> PathBuf {
        let path = dir.path().join("policy.json");
        std::fs::write(&path, body.to_string()).unwrap();
        path
    }

    /// Single linear layer that passes the observation through and
    /// gives Stop a constant logit of 0.5.
    fn passthrough_checkpoint() -> serde_json::Value {
        json!({
            "layers": [{
                "weights": [
                    [1.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0],
                    [0.0, 0.0, 1.0],
                    [0.0, 0.0, 0.0],
                ],
                "biases": [0.0, 0.0, 0.0, 0.5],
            }]
        })
    }

    fn filled_state(context: usize) -> AgentState {
        let mut state = AgentState::new("q");
        state.context = (0..context)
            .map(|_| SemanticHit {
                text: "x".to_string(),
                score: 0.9,
                metadata: serde_json::Map::new(),
            })
            .collect();
        state
    }

    #[test]
    fn argmax_follows_the_strongest_logit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_checkpoint(&dir, passthrough_checkpoint());
        let policy = CheckpointPolicy::load(&path, true, 7).unwrap();

        // Context observation 0.9 beats the Stop bias of 0.5.
        assert_eq!(
            policy.select(&filled_state(9)).unwrap(),
            Action::VectorSearch
        );
        // All-zero observation leaves Stop as the strongest logit.
        assert_eq!(policy.select(&filled_state(0)).unwrap(), Action::Stop);
    }

    #[test]
    fn stochastic_sampling_is_reproducible_per_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_checkpoint(&dir, passthrough_checkpoint());
        let a = CheckpointPolicy::load(&path, false, 42).unwrap();
        let b = CheckpointPolicy::load(&path, false, 42).unwrap();

        let obs = [0.2_f32, 0.2, 0.2];
        let draws_a: Vec<usize> = (0..10).map(|_| a.predict(&obs, false)).collect();
        let draws_b: Vec<usize> = (0..10).map(|_| b.predict(&obs, false)).collect();
        assert_eq!(draws_a, draws_b);
        assert!(draws_a.iter().all(|&i| i < Action::ALL.len()));
    }

    #[test]
    fn rejects_wrong_logit_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_checkpoint(
            &dir,
            json!({
                "layers": [{
                    "weights": [
                        [1.0, 0.0, 0.0],
                        [0.0, 1.0, 0.0],
                        [0.0, 0.0, 1.0],
                        [0.0, 0.0, 0.0],
                        [0.0, 0.0, 0.0],
                    ],
                    "biases": [0.0, 0.0, 0.0, 0.0, 0.0],
                }]
            }),
        );
        let err = CheckpointPolicy::load(&path, true, 7).unwrap_err();
        assert!(matches!(
            err,
            PetrelError::AgentError(AgentError::CheckpointLoadFailed { .. })
        ));
    }

    #[test]
    fn rejects_mismatched_row_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_checkpoint(
            &dir,
            json!({
                "layers": [{
                    "weights": [
                        [1.0, 0.0],
                        [0.0, 1.0],
                        [0.0, 0.0],
                        [0.0, 0.0],
                    ],
                    "biases": [0.0, 0.0, 0.0, 0.0],
                }]
            }),
        );
        assert!(CheckpointPolicy::load(&path, true, 7).is_err());
    }

    #[test]
    fn rejects_row_and_bias_count_disagreement() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_checkpoint(
            &dir,
            json!({
                "layers": [{
                    "weights": [
                        [1.0, 0.0, 0.0],
                        [0.0, 1.0, 0.0],
                        [0.0, 0.0, 1.0],
                        [0.0, 0.0, 0.0],
                    ],
                    "biases": [0.0, 0.0, 0.0],
                }]
            }),
        );
        assert!(CheckpointPolicy::load(&path, true, 7).is_err());
    }

    #[test]
    fn rejects_empty_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_checkpoint(&dir, json!({"layers": []}));
        assert!(CheckpointPolicy::load(&empty, true, 7).is_err());

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert!(CheckpointPolicy::load(&garbage, true, 7).is_err());

        let missing = dir.path().join("missing.json");
        assert!(CheckpointPolicy::load(&missing, true, 7).is_err());
    }
}
