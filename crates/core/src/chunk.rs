//! Retrieved-chunk domain types.
//!
//! A `RetrievedChunk` is the atomic unit of context assembly: a bounded
//! span of document text produced by a retrieval collaborator (vector
//! search or full-document store). A `ScoredChunk` wraps one chunk with
//! the per-source score contributions the hybrid ranking path computes.

use serde::{Deserialize, Serialize};

/// Composite identity key for a chunk within one retrieval batch.
///
/// Invariant: unique within a batch. Chunks sharing a key across the
/// vector and full-document lists merge into exactly one `ScoredChunk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkKey {
    pub document_id: String,
    pub chunk_number: usize,
}

/// Which retrieval source(s) produced a scored chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkSource {
    Vector,
    FullDoc,
    Both,
}

/// A passage of document text from a retrieval collaborator.
///
/// Immutable once produced; the engine never mutates retrieval output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Explicit chunk ID, if the retrieval backend assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Source document identifier.
    pub document_id: String,

    /// Human-readable document name (filename, title, URL).
    pub document_name: String,

    /// The text content of this chunk.
    pub content: String,

    /// Sequential chunk index within the document (1-based).
    pub chunk_number: usize,

    /// Total chunks in the source document (0 = unknown).
    #[serde(default)]
    pub total_chunks: usize,

    /// Relevance score from the retrieval backend.
    /// Meaningful only for vector-sourced chunks.
    #[serde(default)]
    pub score: f64,

    /// Free-form metadata (may carry header/summary/content-type hints).
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Page number in the source document, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl RetrievedChunk {
    /// The chunk's identifier: the explicit id when present, otherwise
    /// derived from document id + chunk number.
    pub fn chunk_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}_{}", self.document_id, self.chunk_number),
        }
    }

    /// The composite identity key used for cross-source merging.
    pub fn key(&self) -> ChunkKey {
        ChunkKey {
            document_id: self.document_id.clone(),
            chunk_number: self.chunk_number,
        }
    }

    /// Whether metadata marks this chunk as a document header.
    pub fn is_header(&self) -> bool {
        self.metadata_flag("is_header") || self.metadata_kind_is(&["header", "heading", "title"])
    }

    /// Whether metadata marks this chunk as a summary, abstract, or
    /// introduction.
    pub fn is_summary(&self) -> bool {
        self.metadata_flag("is_summary")
            || self.metadata_kind_is(&["summary", "abstract", "introduction"])
    }

    fn metadata_flag(&self, field: &str) -> bool {
        self.metadata
            .get(field)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn metadata_kind_is(&self, kinds: &[&str]) -> bool {
        ["type", "content_type"].iter().any(|field| {
            self.metadata
                .get(*field)
                .and_then(|v| v.as_str())
                .is_some_and(|s| kinds.iter().any(|k| s.eq_ignore_ascii_case(k)))
        })
    }
}

/// One chunk with its per-source score contributions and budget cost.
///
/// Derived per request by the hybrid ranking path; discarded after
/// assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The underlying retrieved passage.
    pub chunk: RetrievedChunk,

    /// Vector-search contribution (0.0 for full-doc-only chunks).
    pub vector_score: f64,

    /// Full-document heuristic contribution (0.0 for vector-only chunks).
    pub full_doc_score: f64,

    /// Positional contribution (earlier chunks score higher).
    pub position_score: f64,

    /// Multiplier applied for summary/abstract/introduction chunks.
    pub summary_boost: f64,

    /// The weighted, boosted combined score.
    pub combined_score: f64,

    /// Which source(s) produced this chunk.
    pub source: ChunkSource,

    /// Assigned priority-tier name.
    pub tier: String,

    /// Estimated token cost of the chunk content.
    pub estimated_tokens: usize,
}
