//! # petrel-embed
//!
//! Embedding generation for queries and chunks. A configured primary
//! provider (Ollama when reachable) with a deterministic hashed TF-IDF
//! fallback, fronted by an in-memory cache keyed by content hash.

pub mod cache;
pub mod engine;
pub mod providers;

pub use engine::EmbedEngine;
