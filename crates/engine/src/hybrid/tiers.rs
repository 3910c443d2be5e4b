//! Priority tier assignment.
//!
//! Tiers are evaluated by descending `min_score`; a chunk lands in the
//! first tier whose threshold its combined score meets. Chunks below
//! every threshold fall into the lowest tier. With no tiers configured
//! everything goes to a single `default` tier.

use crate::config::PriorityTier;
use contextforge_core::chunk::ScoredChunk;

pub(crate) const DEFAULT_TIER: &str = "default";

/// Assign a tier name to every chunk in place.
pub(crate) fn assign_tiers(chunks: &mut [ScoredChunk], tiers: &[PriorityTier]) {
    if tiers.is_empty() {
        for chunk in chunks.iter_mut() {
            chunk.tier = DEFAULT_TIER.into();
        }
        return;
    }

    let mut ordered: Vec<&PriorityTier> = tiers.iter().collect();
    ordered.sort_by(|a, b| {
        b.min_score
            .partial_cmp(&a.min_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    // After the descending sort the last entry is the lowest tier.
    let lowest = ordered[ordered.len() - 1];

    for chunk in chunks.iter_mut() {
        let tier = ordered
            .iter()
            .find(|t| chunk.combined_score >= t.min_score)
            .copied()
            .unwrap_or(lowest);
        chunk.tier = tier.name.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contextforge_core::chunk::{ChunkSource, RetrievedChunk};

    fn scored(score: f64) -> ScoredChunk {
        ScoredChunk {
            chunk: RetrievedChunk {
                id: None,
                document_id: "doc".into(),
                document_name: "doc.md".into(),
                content: "text".into(),
                chunk_number: 1,
                total_chunks: 1,
                score: 0.0,
                metadata: serde_json::Map::new(),
                page: None,
            },
            vector_score: 0.0,
            full_doc_score: 0.0,
            position_score: 0.0,
            summary_boost: 1.0,
            combined_score: score,
            source: ChunkSource::Vector,
            tier: String::new(),
            estimated_tokens: 1,
        }
    }

    fn three_tiers() -> Vec<PriorityTier> {
        vec![
            PriorityTier::new("high", 0.8, 0.5),
            PriorityTier::new("medium", 0.5, 0.3),
            PriorityTier::new("low", 0.0, 0.2),
        ]
    }

    #[test]
    fn tier_boundaries() {
        let mut chunks = vec![scored(0.9), scored(0.6), scored(0.2)];
        assign_tiers(&mut chunks, &three_tiers());
        assert_eq!(chunks[0].tier, "high");
        assert_eq!(chunks[1].tier, "medium");
        assert_eq!(chunks[2].tier, "low");
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut chunks = vec![scored(0.8), scored(0.5)];
        assign_tiers(&mut chunks, &three_tiers());
        assert_eq!(chunks[0].tier, "high");
        assert_eq!(chunks[1].tier, "medium");
    }

    #[test]
    fn below_every_threshold_falls_to_lowest() {
        let tiers = vec![
            PriorityTier::new("high", 0.8, 0.6),
            PriorityTier::new("medium", 0.5, 0.4),
        ];
        let mut chunks = vec![scored(0.1)];
        assign_tiers(&mut chunks, &tiers);
        assert_eq!(chunks[0].tier, "medium");
    }

    #[test]
    fn no_tiers_means_default() {
        let mut chunks = vec![scored(0.9), scored(0.1)];
        assign_tiers(&mut chunks, &[]);
        assert!(chunks.iter().all(|c| c.tier == DEFAULT_TIER));
    }

    #[test]
    fn declaration_order_does_not_matter() {
        let shuffled = vec![
            PriorityTier::new("low", 0.0, 0.2),
            PriorityTier::new("high", 0.8, 0.5),
            PriorityTier::new("medium", 0.5, 0.3),
        ];
        let mut chunks = vec![scored(0.9)];
        assign_tiers(&mut chunks, &shuffled);
        assert_eq!(chunks[0].tier, "high");
    }
}
