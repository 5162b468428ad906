//! Default values for every configuration section.
//!
//! Kept in one place so the docs, the `Default` impls, and the tests
//! all agree on what an unconfigured system does.

// --- Store ---
pub const DEFAULT_WORKSPACE_ROOT: &str = "KnowledgeGraph";
pub const DEFAULT_DB_FILENAME: &str = "petrel.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Embedding ---
pub const DEFAULT_EMBED_PROVIDER: &str = "hashed-tfidf";
pub const DEFAULT_EMBED_DIMENSIONS: usize = 384;
pub const DEFAULT_EMBED_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_OLLAMA_EMBED_MODEL: &str = "nomic-embed-text";

// --- Retrieval ---
pub const DEFAULT_VECTOR_TOP_K: usize = 5;
pub const DEFAULT_GRAPH_TOP_K: usize = 10;
pub const DEFAULT_PER_SEED_LIMIT: usize = 3;
pub const DEFAULT_ALIAS_EXPANSION: bool = true;

// --- Agent ---
pub const DEFAULT_MAX_STEPS: u32 = 6;
pub const DEFAULT_USE_LLM: bool = true;
pub const DEFAULT_SEED: u64 = 7;

// --- Generation ---
pub const DEFAULT_GENERATION_BACKEND: &str = "ollama";
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-oss:20b";
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_GENERATION_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_GENERATION_RETRIES: u32 = 3;
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_PING_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

// --- Policy ---
pub const DEFAULT_POLICY_KIND: &str = "heuristic";
pub const DEFAULT_VECTOR_THRESHOLD: f32 = 0.3;
pub const DEFAULT_GRAPH_THRESHOLD: f32 = 0.35;
pub const DEFAULT_STOP_THRESHOLD: f32 = 0.8;

// --- Observability ---
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_LEVEL: &str = "info";
