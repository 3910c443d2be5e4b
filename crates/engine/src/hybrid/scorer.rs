//! Per-source and combined relevance scoring.
//!
//! Every chunk gets a positional score; full-document chunks additionally
//! get a structural heuristic score. Chunks sharing an identity key across
//! the two input lists merge into one `Both`-tagged chunk with both
//! contributions in the combined score.
//!
//! Tie-break for merged payloads: the full-document list is processed
//! second, so a merged chunk carries the full-document occurrence's
//! content and metadata.

use crate::config::HybridContextConfig;
use contextforge_core::chunk::{ChunkKey, ChunkSource, RetrievedChunk, ScoredChunk};
use contextforge_core::token::TokenEstimator;
use std::collections::HashMap;

/// Score and merge both retrieval lists into an unordered scored set,
/// then sort descending by combined score for presentation.
pub(crate) fn score_chunks(
    vector_chunks: &[RetrievedChunk],
    full_doc_chunks: &[RetrievedChunk],
    estimator: &dyn TokenEstimator,
    config: &HybridContextConfig,
) -> Vec<ScoredChunk> {
    let mut by_key: HashMap<ChunkKey, ScoredChunk> = HashMap::new();

    for chunk in vector_chunks {
        let entry = make_scored(chunk, estimator, config, ChunkSource::Vector);
        by_key.insert(chunk.key(), entry);
    }

    for chunk in full_doc_chunks {
        let fds = full_doc_score(chunk);
        match by_key.get_mut(&chunk.key()) {
            Some(existing) => {
                // Present in both sources: merge, payload from the
                // second-merged (full-document) occurrence.
                existing.source = ChunkSource::Both;
                existing.full_doc_score = fds;
                existing.position_score = position_score(chunk);
                existing.summary_boost = summary_boost(chunk, config);
                existing.estimated_tokens = estimator.estimate(&chunk.content);
                existing.chunk = chunk.clone();
            }
            None => {
                let mut entry = make_scored(chunk, estimator, config, ChunkSource::FullDoc);
                entry.vector_score = 0.0;
                entry.full_doc_score = fds;
                by_key.insert(chunk.key(), entry);
            }
        }
    }

    let mut scored: Vec<ScoredChunk> = by_key
        .into_values()
        .map(|mut s| {
            s.combined_score = (s.vector_score * config.vector_weight
                + s.full_doc_score * config.full_doc_weight
                + s.position_score * config.position_weight)
                * s.summary_boost;
            s
        })
        .collect();

    sort_by_score(&mut scored);
    scored
}

/// Descending combined score; key order breaks exact ties so the result
/// is deterministic across runs.
fn sort_by_score(chunks: &mut [ScoredChunk]) {
    chunks.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk.key().document_id.cmp(&b.chunk.key().document_id))
            .then_with(|| a.chunk.chunk_number.cmp(&b.chunk.chunk_number))
    });
}

fn make_scored(
    chunk: &RetrievedChunk,
    estimator: &dyn TokenEstimator,
    config: &HybridContextConfig,
    source: ChunkSource,
) -> ScoredChunk {
    ScoredChunk {
        vector_score: chunk.score,
        full_doc_score: 0.0,
        position_score: position_score(chunk),
        summary_boost: summary_boost(chunk, config),
        combined_score: 0.0,
        source,
        tier: String::new(),
        estimated_tokens: estimator.estimate(&chunk.content),
        chunk: chunk.clone(),
    }
}

/// Earlier chunks score higher: `1 − chunk_number / total_chunks`.
/// Unknown document length is treated as 100 chunks.
fn position_score(chunk: &RetrievedChunk) -> f64 {
    let total = if chunk.total_chunks == 0 {
        100
    } else {
        chunk.total_chunks
    };
    1.0 - chunk.chunk_number as f64 / total as f64
}

/// Structural heuristic for full-document chunks: base 0.5, early chunks
/// and header/summary markers add to it.
fn full_doc_score(chunk: &RetrievedChunk) -> f64 {
    let mut score = 0.5;
    if chunk.chunk_number <= 2 {
        score += 0.3;
    }
    if chunk.is_header() {
        score += 0.2;
    }
    if chunk.is_summary() {
        score += 0.3;
    }
    score
}

fn summary_boost(chunk: &RetrievedChunk, config: &HybridContextConfig) -> f64 {
    if config.include_summaries && chunk.is_summary() {
        config.summary_boost
    } else {
        1.0
    }
}
