//! The hybrid ranking path.
//!
//! Scorer → Deduplicator (optional) → Tier Assigner → Budget Allocator.
//! A pure, synchronous, CPU-bound computation over request-scoped
//! inputs: no shared state, trivially safe to run concurrently across
//! independent requests.

mod budget;
mod dedup;
mod scorer;
mod tiers;

pub use budget::TierUsage;

use crate::config::HybridContextConfig;
use contextforge_core::chunk::{ChunkSource, RetrievedChunk, ScoredChunk};
use contextforge_core::token::TokenEstimator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The assembled, budget-fitted context selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridContextResult {
    /// Selected chunks, sorted descending by combined score.
    pub chunks: Vec<ScoredChunk>,

    /// Total estimated tokens of the selection.
    pub total_tokens: usize,

    /// Selected chunks that came from vector search (includes merged).
    pub vector_count: usize,

    /// Selected chunks that came from the document store (includes merged).
    pub full_doc_count: usize,

    /// Chunks removed by content deduplication.
    pub duplicates_removed: usize,

    /// Per-tier token accounting.
    pub tier_usage: BTreeMap<String, TierUsage>,

    /// Echo of the configuration the assembly used.
    pub config: HybridContextConfig,
}

/// The hybrid context engine. Stateless — create one and reuse it.
pub struct HybridContextEngine {
    config: HybridContextConfig,
}

impl HybridContextEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: HybridContextConfig) -> Self {
        Self { config }
    }

    /// Assemble a ranked, deduplicated, budget-fitted context from the
    /// two retrieval lists.
    ///
    /// # Algorithm
    ///
    /// 1. Score every chunk and merge cross-source occurrences by key
    /// 2. Deduplicate by content hash (when configured)
    /// 3. Assign priority tiers
    /// 4. Fit the selection into the token budget, tier by tier
    pub fn assemble(
        &self,
        vector_chunks: &[RetrievedChunk],
        full_doc_chunks: &[RetrievedChunk],
        estimator: &dyn TokenEstimator,
    ) -> HybridContextResult {
        debug!(
            vector = vector_chunks.len(),
            full_doc = full_doc_chunks.len(),
            "hybrid assembly starting"
        );

        let scored = scorer::score_chunks(vector_chunks, full_doc_chunks, estimator, &self.config);

        let (mut scored, duplicates_removed) = if self.config.deduplicate_by_content {
            dedup::dedup_by_content(scored)
        } else {
            (scored, 0)
        };

        tiers::assign_tiers(&mut scored, &self.config.priority_tiers);

        let (selected, tier_usage) = budget::allocate(scored, &self.config);

        let total_tokens: usize = selected.iter().map(|c| c.estimated_tokens).sum();
        let vector_count = selected
            .iter()
            .filter(|c| matches!(c.source, ChunkSource::Vector | ChunkSource::Both))
            .count();
        let full_doc_count = selected
            .iter()
            .filter(|c| matches!(c.source, ChunkSource::FullDoc | ChunkSource::Both))
            .count();

        info!(
            selected = selected.len(),
            total_tokens,
            duplicates_removed,
            "hybrid assembly complete"
        );

        HybridContextResult {
            chunks: selected,
            total_tokens,
            vector_count,
            full_doc_count,
            duplicates_removed,
            tier_usage,
            config: self.config.clone(),
        }
    }
}
