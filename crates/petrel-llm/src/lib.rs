//! Text-generation clients for turning gathered evidence into prose.
//!
//! The agent only calls a generator after the retrieval loop has
//! terminated, so everything here is synchronous and bounded: the
//! local-first Ollama backend retries transient failures with linear
//! backoff before surfacing a fatal error, and the OpenAI-compatible
//! backend makes a single authenticated attempt.

pub mod generators;

pub use generators::{create_generator, OllamaGenerator, OpenAiGenerator};
