//! Token budget allocation.
//!
//! Each tier gets `global_budget · budget_percentage`, capped by the
//! tier's optional max. Admission is greedy first-fit in score order —
//! a chunk that does not fit is skipped, never reordered in. Whatever
//! the tiers leave unused is redistributed over the full score-ordered
//! list, again first-fit. This is a deliberate approximation, not an
//! optimal knapsack.

use crate::config::{HybridContextConfig, PriorityTier};
use crate::hybrid::tiers::DEFAULT_TIER;
use contextforge_core::chunk::ScoredChunk;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-tier token accounting reported with the assembly result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierUsage {
    /// Tokens consumed by selected chunks attributed to this tier.
    pub used_tokens: usize,
    /// Number of selected chunks in this tier.
    pub chunk_count: usize,
    /// The tier's computed sub-budget (0 in unlimited mode).
    pub budget_tokens: usize,
}

/// Select the subset of chunks that fits the global budget.
///
/// `chunks` must already be sorted descending by combined score (the
/// scorer guarantees this), so within each tier admission happens in
/// score order. Returns the selection re-sorted descending by score and
/// the per-tier usage breakdown.
pub(crate) fn allocate(
    chunks: Vec<ScoredChunk>,
    config: &HybridContextConfig,
) -> (Vec<ScoredChunk>, BTreeMap<String, TierUsage>) {
    let mut usage: BTreeMap<String, TierUsage> = BTreeMap::new();

    // Unlimited mode: an explicit sentinel, not a misconfiguration.
    if config.token_budget == 0 {
        for chunk in &chunks {
            let entry = usage.entry(chunk.tier.clone()).or_default();
            entry.used_tokens += chunk.estimated_tokens;
            entry.chunk_count += 1;
        }
        return (chunks, usage);
    }

    let global = config.token_budget;
    let tiers = effective_tiers(config);
    let mut selected = vec![false; chunks.len()];
    let mut used_total = 0usize;

    for tier in &tiers {
        let percentage_budget = (global as f64 * tier.budget_percentage) as usize;
        // Tier percentages are not required to sum to 1.0, so every
        // tier budget is also capped by what is left of the global
        // budget.
        let tier_budget = match tier.max_tokens {
            Some(max) => percentage_budget.min(max),
            None => percentage_budget,
        }
        .min(global - used_total);

        let entry = usage.entry(tier.name.clone()).or_default();
        entry.budget_tokens = tier_budget;

        for (i, chunk) in chunks.iter().enumerate() {
            if chunk.tier != tier.name {
                continue;
            }
            if entry.used_tokens + chunk.estimated_tokens <= tier_budget {
                selected[i] = true;
                entry.used_tokens += chunk.estimated_tokens;
                entry.chunk_count += 1;
                used_total += chunk.estimated_tokens;
            }
            // Skipped chunks stay skipped within the tier pass; a later
            // smaller chunk may still be admitted (first-fit).
        }
    }

    // Redistribute the unused global remainder over the full
    // score-ordered list.
    let mut remaining = global.saturating_sub(used_total);
    for (i, chunk) in chunks.iter().enumerate() {
        if selected[i] || chunk.estimated_tokens > remaining {
            continue;
        }
        selected[i] = true;
        remaining -= chunk.estimated_tokens;
        let entry = usage.entry(chunk.tier.clone()).or_default();
        entry.used_tokens += chunk.estimated_tokens;
        entry.chunk_count += 1;
    }

    let kept: Vec<ScoredChunk> = chunks
        .into_iter()
        .zip(selected)
        .filter_map(|(chunk, keep)| keep.then_some(chunk))
        .collect();

    debug!(
        budget = global,
        selected = kept.len(),
        remaining,
        "budget allocation complete"
    );

    // Input order is already descending by score and selection preserves
    // it, so no re-sort is needed here.
    (kept, usage)
}

fn effective_tiers(config: &HybridContextConfig) -> Vec<PriorityTier> {
    if config.priority_tiers.is_empty() {
        vec![PriorityTier::new(DEFAULT_TIER, 0.0, 1.0)]
    } else {
        config.priority_tiers.clone()
    }
}
