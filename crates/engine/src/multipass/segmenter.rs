//! Chunk stream segmentation.
//!
//! Splits an ordered chunk stream (retrieval order, never re-ranked)
//! into token-bounded windows. Adjacent windows share a trailing overlap
//! so local continuity survives the segment boundary.

use crate::config::MultiPassConfig;
use contextforge_core::chunk::RetrievedChunk;
use contextforge_core::token::TokenEstimator;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A token-bounded window of the chunk stream. Transient — lives only
/// for the duration of one multi-pass run.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Zero-based segment index.
    pub index: usize,
    /// The chunks in this window, in stream order.
    pub chunks: Vec<RetrievedChunk>,
    /// The window rendered as one text block.
    pub text: String,
    /// Number of chunks in the window.
    pub chunk_count: usize,
    /// Number of distinct documents in the window.
    pub document_count: usize,
    /// Sum of the chunks' estimated token costs.
    pub estimated_tokens: usize,
}

/// Split `chunks` into overlapping segments of at most
/// `config.segment_size` tokens, truncated to `config.max_passes`.
///
/// A single chunk larger than the segment size still forms its own
/// segment — forced inclusion, not an error.
pub(crate) fn build_segments(
    chunks: &[RetrievedChunk],
    config: &MultiPassConfig,
    estimator: &dyn TokenEstimator,
) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut current: Vec<RetrievedChunk> = Vec::new();
    let mut current_tokens = 0usize;

    for chunk in chunks {
        let cost = estimator.estimate(&chunk.content);

        if !current.is_empty() && current_tokens + cost > config.segment_size {
            let (mut seed, mut seed_tokens) =
                overlap_tail(&current, config.overlap_tokens, estimator);
            segments.push(make_segment(segments.len(), current, current_tokens));

            // The seed plus the incoming chunk must still respect the
            // segment size; drop the oldest seed chunks until it does.
            while !seed.is_empty() && seed_tokens + cost > config.segment_size {
                let dropped = seed.remove(0);
                seed_tokens -= estimator.estimate(&dropped.content);
            }

            current = seed;
            current_tokens = seed_tokens;
        }

        current.push(chunk.clone());
        current_tokens += cost;
    }

    if !current.is_empty() {
        segments.push(make_segment(segments.len(), current, current_tokens));
    }

    if segments.len() > config.max_passes {
        warn!(
            produced = segments.len(),
            kept = config.max_passes,
            "segment count exceeds max passes, truncating"
        );
        segments.truncate(config.max_passes);
    }

    debug!(segments = segments.len(), "segmentation complete");
    segments
}

/// The trailing sub-list of a closed segment whose token sum stays
/// within the overlap budget, walking backward from the last chunk.
fn overlap_tail(
    closed: &[RetrievedChunk],
    overlap_budget: usize,
    estimator: &dyn TokenEstimator,
) -> (Vec<RetrievedChunk>, usize) {
    let mut tail: Vec<RetrievedChunk> = Vec::new();
    let mut tokens = 0usize;

    for chunk in closed.iter().rev() {
        let cost = estimator.estimate(&chunk.content);
        if tokens + cost > overlap_budget {
            break;
        }
        tail.insert(0, chunk.clone());
        tokens += cost;
    }

    (tail, tokens)
}

fn make_segment(index: usize, chunks: Vec<RetrievedChunk>, estimated_tokens: usize) -> Segment {
    let text = render_segment(&chunks);
    let document_count = chunks
        .iter()
        .map(|c| c.document_id.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    Segment {
        index,
        chunk_count: chunks.len(),
        document_count,
        estimated_tokens,
        text,
        chunks,
    }
}

/// Render a segment with start/end markers and a document header each
/// time the document id changes mid-segment.
fn render_segment(chunks: &[RetrievedChunk]) -> String {
    let mut out = String::from("--- SEGMENT START ---\n");
    let mut current_doc: Option<&str> = None;

    for chunk in chunks {
        if current_doc != Some(chunk.document_id.as_str()) {
            out.push_str(&format!("\n[Document: {}]\n", chunk.document_name));
            current_doc = Some(chunk.document_id.as_str());
        }
        out.push_str(&chunk.content);
        out.push('\n');
    }

    out.push_str("--- SEGMENT END ---");
    out
}
