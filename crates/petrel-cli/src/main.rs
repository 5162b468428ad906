//! `petrel`: command-line front end for the evidence store and agent.
//!
//! Three subcommands cover the workflow end to end: `ingest` builds the
//! SQLite store from a paper corpus, `ask` runs one retrieval episode
//! against it, and `eval` scores the agent over a question/keyword
//! benchmark. Reports print to stdout as JSON; diagnostics go to
//! stderr so piped output stays machine-readable.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use petrel_agent::{eval, load_policy, Agent};
use petrel_core::traits::IGenerator;
use petrel_core::PetrelConfig;
use petrel_embed::EmbedEngine;
use petrel_ingest::{ingest_edges_file, ingest_text_dir};
use petrel_llm::create_generator;
use petrel_retrieval::runtime::{self, RuntimeOptions};
use petrel_retrieval::EventLog;
use petrel_store::StoreEngine;

#[derive(Parser)]
#[command(name = "petrel", version, about = "Retrieval agent for the PETase literature")]
struct Cli {
    /// Configuration file; compiled defaults apply when it is absent.
    #[arg(long, global = true, default_value = "petrel.toml")]
    config: PathBuf,

    /// SQLite evidence store, overriding the configured path.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one agent episode against a question and print the report.
    Ask(AskArgs),
    /// Score the agent on a question/keyword benchmark.
    Eval(EvalArgs),
    /// Build or extend the evidence store from a corpus.
    Ingest(IngestArgs),
}

#[derive(Args)]
struct AskArgs {
    /// Natural-language research question.
    question: String,

    #[command(flatten)]
    llm: LlmToggle,

    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Args)]
struct EvalArgs {
    /// JSON dataset of question/keyword cases; omit for the built-in set.
    #[arg(long)]
    dataset: Option<PathBuf>,

    #[command(flatten)]
    llm: LlmToggle,

    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Args)]
struct IngestArgs {
    /// Prepared JSONL edge file to load instead of extracting text.
    #[arg(long, conflicts_with = "text_dir")]
    edges: Option<PathBuf>,

    /// Directory of extracted paper text, one `.txt` per source PDF.
    #[arg(long)]
    text_dir: Option<PathBuf>,

    /// Also write the extracted edges to this JSONL file.
    #[arg(long, conflicts_with = "edges")]
    out_edges: Option<PathBuf>,
}

/// `--use-llm` / `--no-llm` pair; neither flag defers to the config.
#[derive(Args)]
struct LlmToggle {
    /// Compose the final answer with the generation backend.
    #[arg(long, conflicts_with = "no_llm")]
    use_llm: bool,

    /// Extractive answers only; never call the generation backend.
    #[arg(long)]
    no_llm: bool,
}

impl LlmToggle {
    fn resolve(&self, configured: bool) -> bool {
        if self.no_llm {
            false
        } else if self.use_llm {
            true
        } else {
            configured
        }
    }
}

#[derive(Args)]
struct PolicyArgs {
    /// Policy kind: heuristic, preference, or checkpoint.
    #[arg(long)]
    policy: Option<String>,

    /// Trained checkpoint file; implies the checkpoint policy.
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Seed for stochastic action sampling.
    #[arg(long)]
    seed: Option<u64>,
}

impl PolicyArgs {
    fn apply(self, config: &mut PetrelConfig) {
        if let Some(kind) = self.policy {
            config.policy.kind = kind;
        } else if self.checkpoint.is_some() {
            config.policy.kind = "checkpoint".to_string();
        }
        if let Some(path) = self.checkpoint {
            config.policy.checkpoint_path = Some(path.to_string_lossy().into_owned());
        }
        if let Some(seed) = self.seed {
            config.agent.seed = seed;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let Cli { config: config_path, db, command } = Cli::parse();
    let config = PetrelConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    init_tracing(&config.observability.log_level);

    match command {
        Command::Ask(args) => ask(args, config, db),
        Command::Eval(args) => eval_benchmark(args, config, db),
        Command::Ingest(args) => ingest(args, config, db),
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_env("PETREL_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn ask(args: AskArgs, mut config: PetrelConfig, db: Option<PathBuf>) -> anyhow::Result<()> {
    let use_llm = args.llm.resolve(config.agent.use_llm);
    args.policy.apply(&mut config);

    runtime::initialize(RuntimeOptions { db_path: db, config: Some(config) })?;
    let runtime = runtime::get()?;

    let policy = load_policy(&runtime.config.policy, runtime.config.agent.seed)?;
    let generator = build_generator(&runtime.config, use_llm)?;
    let mut agent = Agent::from_runtime(&runtime, policy, generator);

    let report = agent.run(&args.question)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn eval_benchmark(
    args: EvalArgs,
    mut config: PetrelConfig,
    db: Option<PathBuf>,
) -> anyhow::Result<()> {
    let use_llm = args.llm.resolve(config.agent.use_llm);
    args.policy.apply(&mut config);

    runtime::initialize(RuntimeOptions { db_path: db, config: Some(config) })?;
    let runtime = runtime::get()?;

    let dataset = match &args.dataset {
        Some(path) => eval::load_dataset(path)
            .with_context(|| format!("loading dataset {}", path.display()))?,
        None => eval::default_dataset(),
    };

    // Probe the backend once up front; workers then build their own
    // clients without repeating the reachability check.
    let llm_ok = build_generator(&runtime.config, use_llm)?.is_some();

    let log_path = Path::new(&runtime.config.observability.log_dir).join(eval::EVAL_LOG);
    let eval_log = match EventLog::open(&log_path) {
        Ok(log) => log,
        Err(e) => {
            warn!(error = %e, "benchmark log unavailable; rows will not be recorded");
            EventLog::disabled()
        }
    };

    let make_agent = || {
        let policy = load_policy(&runtime.config.policy, runtime.config.agent.seed)?;
        let generator = if llm_ok {
            Some(create_generator(&runtime.config.generation)?)
        } else {
            None
        };
        Ok(Agent::from_runtime(&runtime, policy, generator))
    };

    let summary = eval::evaluate(&dataset, llm_ok, make_agent, &eval_log)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn ingest(args: IngestArgs, config: PetrelConfig, db: Option<PathBuf>) -> anyhow::Result<()> {
    let db_path = db.unwrap_or_else(|| config.store.db_path());
    let store = StoreEngine::open(&db_path, config.store.read_pool_size)?;
    let embedder = EmbedEngine::new(&config.embedding);

    let report = match &args.edges {
        Some(edges_path) => ingest_edges_file(&store, &embedder, edges_path)?,
        None => {
            let text_dir = args.text_dir.unwrap_or_else(|| config.store.text_dir());
            ingest_text_dir(&store, &embedder, &text_dir, args.out_edges.as_deref())?
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Build the generator when requested and reachable; otherwise run
/// extractive so an offline backend degrades instead of failing.
fn build_generator(
    config: &PetrelConfig,
    use_llm: bool,
) -> anyhow::Result<Option<Box<dyn IGenerator>>> {
    if !use_llm {
        return Ok(None);
    }
    let generator = create_generator(&config.generation)?;
    if !generator.is_available() {
        warn!(
            backend = %config.generation.backend,
            "generation backend unreachable, falling back to extractive answers"
        );
        return Ok(None);
    }
    Ok(Some(generator))
}
