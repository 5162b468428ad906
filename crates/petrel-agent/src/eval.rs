//! Keyword-coverage benchmark over a question dataset.
//!
//! Each dataset row pairs a question with the keywords a good answer
//! should mention. Coverage is the fraction of keywords found in the
//! answer, case-insensitively. Episodes are independent, so the
//! benchmark fans out across threads with one agent per case.

use std::path::Path;

use petrel_core::errors::PetrelResult;
use petrel_retrieval::EventLog;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::driver::Agent;

/// File name of the benchmark row log, relative to the log directory.
pub const EVAL_LOG: &str = "eval_runs.jsonl";

/// One benchmark case: a question and the keywords its answer should
/// contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub question: String,
    pub keywords: Vec<String>,
}

/// Per-case benchmark result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRow {
    pub question: String,
    pub keywords: Vec<String>,
    pub answer: String,
    pub hits: usize,
    pub coverage: f64,
    pub use_llm: bool,
}

/// Whole-benchmark result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub use_llm: bool,
    pub mean_coverage: f64,
    pub rows: Vec<EvalRow>,
}

/// The built-in PETase benchmark.
pub fn default_dataset() -> Vec<EvalCase> {
    vec![
        EvalCase {
            question: "What mutations improve PETase thermostability?".to_string(),
            keywords: ["N233K", "R224Q", "S121E", "T140D"]
                .map(String::from)
                .to_vec(),
        },
        EvalCase {
            question: "Which engineered PETases target semi-crystalline PET?".to_string(),
            keywords: ["FAST-PETase", "DuraPETase", "LC-Cutinase"]
                .map(String::from)
                .to_vec(),
        },
        EvalCase {
            question: "At what temperatures does ThermoPETase remain active?".to_string(),
            keywords: ["ThermoPETase", "60", "70"].map(String::from).to_vec(),
        },
    ]
}

/// Load a dataset from a JSON file holding a list of
/// `{question, keywords}` entries.
pub fn load_dataset(path: &Path) -> PetrelResult<Vec<EvalCase>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Run the benchmark, one fresh agent per case.
///
/// Rows are appended to `eval_log` as they complete and come back in
/// dataset order. The first episode error aborts the benchmark.
pub fn evaluate(
    dataset: &[EvalCase],
    use_llm: bool,
    make_agent: impl Fn() -> PetrelResult<Agent> + Sync,
    eval_log: &EventLog,
) -> PetrelResult<EvalSummary> {
    let rows: Vec<EvalRow> = dataset
        .par_iter()
        .map(|case| -> PetrelResult<EvalRow> {
            let mut agent = make_agent()?;
            let report = agent.run(&case.question)?;
            let lowered = report.answer.to_lowercase();
            let hits = case
                .keywords
                .iter()
                .filter(|keyword| lowered.contains(&keyword.to_lowercase()))
                .count();
            let coverage = hits as f64 / case.keywords.len().max(1) as f64;
            let row = EvalRow {
                question: case.question.clone(),
                keywords: case.keywords.clone(),
                answer: report.answer,
                hits,
                coverage,
                use_llm,
            };
            eval_log.append_raw(serde_json::to_value(&row)?);
            Ok(row)
        })
        .collect::<PetrelResult<Vec<_>>>()?;

    let mean_coverage =
        rows.iter().map(|row| row.coverage).sum::<f64>() / rows.len().max(1) as f64;
    Ok(EvalSummary {
        use_llm,
        mean_coverage,
        rows,
    })
}
