//! The hybrid retrieval backend.
//!
//! Wraps the evidence store and an embedder behind the three query
//! shapes the agent loop consumes. The backend never mutates the store;
//! concurrent episodes can share one instance freely.

use std::collections::HashSet;
use std::sync::Arc;

use petrel_core::config::RetrievalConfig;
use petrel_core::errors::PetrelResult;
use petrel_core::models::{GraphEdge, SemanticHit};
use petrel_core::traits::{IEmbedder, IEvidenceStore};
use serde_json::json;
use tracing::debug;

use crate::aliases;
use crate::event_log::EventLog;

pub struct RetrievalBackend {
    store: Arc<dyn IEvidenceStore>,
    embedder: Box<dyn IEmbedder>,
    events: EventLog,
    config: RetrievalConfig,
}

impl RetrievalBackend {
    pub fn new(
        store: Arc<dyn IEvidenceStore>,
        embedder: Box<dyn IEmbedder>,
        events: EventLog,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            events,
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// The audit sink this backend writes to. Callers layered above
    /// retrieval reuse it so one file carries the whole run history.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Semantic search over the chunk corpus.
    ///
    /// When alias expansion is enabled the embedded text is the
    /// expanded query, but the audit event records the query exactly
    /// as the caller phrased it.
    pub fn vector_search(&self, query: &str, top_k: usize) -> PetrelResult<Vec<SemanticHit>> {
        let normalized = if self.config.alias_expansion {
            aliases::expand_query(query)
        } else {
            query.to_string()
        };
        let embedding = self.embedder.embed(&normalized)?;
        let hits = self.store.search_vector(&embedding, top_k)?;
        debug!(query, hits = hits.len(), "vector search");
        self.events.append(json!({
            "event": "vector_search",
            "query": query,
            "results": hits,
        }));
        Ok(hits)
    }

    /// Outgoing edges of one entity, newest first.
    pub fn graph_neighbors(&self, node: &str, top_k: usize) -> PetrelResult<Vec<GraphEdge>> {
        let edges = self.store.neighbors(node, top_k)?;
        debug!(node, edges = edges.len(), "graph neighbors");
        self.events.append(json!({
            "event": "graph_neighbors",
            "node": node,
            "results": edges,
        }));
        Ok(edges)
    }

    /// Multi-seed graph expansion that trades depth for breadth.
    ///
    /// Seeds are scanned in [`aliases::preferred_sources`] order, each
    /// contributing at most `per_seed_limit` edges, and an edge is kept
    /// only if its (source, relation, target) triple has not been
    /// emitted earlier in the call. The scan returns as soon as `top_k`
    /// edges are collected, so one densely connected seed cannot crowd
    /// out the rest and total graph reads stay proportional to `top_k`.
    pub fn graph_neighbors_diverse(
        &self,
        seeds: &[String],
        top_k: usize,
    ) -> PetrelResult<Vec<GraphEdge>> {
        let per_seed = self.config.per_seed_limit;
        let mut results: Vec<GraphEdge> = Vec::new();
        let mut seen: HashSet<(String, String, String)> = HashSet::new();

        for node in aliases::preferred_sources(seeds, None) {
            if node.is_empty() {
                continue;
            }
            let edges = self.store.neighbors(&node, per_seed)?;
            for edge in edges {
                if !seen.insert(edge.dedup_key()) {
                    continue;
                }
                results.push(edge);
                if results.len() >= top_k {
                    self.log_diverse(seeds, &results);
                    return Ok(results);
                }
            }
        }
        self.log_diverse(seeds, &results);
        Ok(results)
    }

    fn log_diverse(&self, seeds: &[String], results: &[GraphEdge]) {
        debug!(
            seeds = seeds.len(),
            edges = results.len(),
            "diverse graph expansion"
        );
        self.events.append(json!({
            "event": "graph_neighbors_diverse",
            "seeds": seeds,
            "results": results,
        }));
    }
}
