use serde::{Deserialize, Serialize};

/// One result from a semantic search over the chunk corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticHit {
    /// Chunk text, including the evidence sentence.
    pub text: String,
    /// Cosine similarity against the query embedding.
    pub score: f64,
    /// Chunk metadata as stored at ingest time.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl SemanticHit {
    /// Source entity recorded for this chunk, if any.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(|v| v.as_str())
    }

    /// Paper the chunk was extracted from, if recorded.
    pub fn paper(&self) -> Option<&str> {
        self.metadata.get("paper").and_then(|v| v.as_str())
    }

    /// The part of the text after the "Evidence:" marker, trimmed.
    /// Falls back to the whole text when the marker is absent.
    pub fn evidence_snippet(&self) -> &str {
        self.text
            .splitn(2, "Evidence:")
            .last()
            .unwrap_or(&self.text)
            .trim()
    }
}
