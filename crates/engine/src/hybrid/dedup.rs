//! Content deduplication.
//!
//! Exact-match only: chunks are grouped by a SHA-256 hash of their
//! content and the highest-scored instance per group survives. On a
//! score tie the first-seen representative is kept.

use contextforge_core::chunk::ScoredChunk;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Collapse chunks with identical content. Returns the surviving set
/// (input order preserved) and the number of duplicates removed.
pub(crate) fn dedup_by_content(chunks: Vec<ScoredChunk>) -> (Vec<ScoredChunk>, usize) {
    let mut kept: Vec<ScoredChunk> = Vec::with_capacity(chunks.len());
    let mut by_hash: HashMap<[u8; 32], usize> = HashMap::new();
    let mut removed = 0;

    for chunk in chunks {
        let hash: [u8; 32] = Sha256::digest(chunk.chunk.content.as_bytes()).into();
        match by_hash.get(&hash) {
            Some(&slot) => {
                removed += 1;
                // Strictly higher score replaces; ties keep the first seen.
                if chunk.combined_score > kept[slot].combined_score {
                    kept[slot] = chunk;
                }
            }
            None => {
                by_hash.insert(hash, kept.len());
                kept.push(chunk);
            }
        }
    }

    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contextforge_core::chunk::{ChunkSource, RetrievedChunk};

    fn scored(doc: &str, number: usize, content: &str, score: f64) -> ScoredChunk {
        ScoredChunk {
            chunk: RetrievedChunk {
                id: None,
                document_id: doc.into(),
                document_name: format!("{doc}.md"),
                content: content.into(),
                chunk_number: number,
                total_chunks: 10,
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
            estimated_tokens: content.len().div_ceil(4),
        }
    }

    #[test]
    fn identical_content_collapses_to_best_score() {
        let input = vec![
            scored("doc1", 1, "same text", 0.5),
            scored("doc2", 1, "same text", 0.9),
            scored("doc3", 1, "same text", 0.7),
            scored("doc4", 1, "different text", 0.3),
        ];

        let (kept, removed) = dedup_by_content(input);
        assert_eq!(kept.len(), 2);
        assert_eq!(removed, 2);

        let survivor = kept.iter().find(|c| c.chunk.content == "same text").unwrap();
        assert_eq!(survivor.chunk.document_id, "doc2");
        assert!((survivor.combined_score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn n_duplicates_leave_one_survivor() {
        let input: Vec<ScoredChunk> = (0..5)
            .map(|i| scored(&format!("doc{i}"), 1, "repeated", 0.1 * i as f64))
            .collect();

        let (kept, removed) = dedup_by_content(input);
        assert_eq!(kept.len(), 1);
        assert_eq!(removed, 4);
    }

    #[test]
    fn ties_keep_first_seen() {
        let input = vec![
            scored("first", 1, "tied", 0.8),
            scored("second", 1, "tied", 0.8),
        ];

        let (kept, removed) = dedup_by_content(input);
        assert_eq!(removed, 1);
        assert_eq!(kept[0].chunk.document_id, "first");
    }

    #[test]
    fn unique_content_untouched() {
        let input = vec![
            scored("doc1", 1, "alpha", 0.9),
            scored("doc1", 2, "beta", 0.8),
        ];

        let (kept, removed) = dedup_by_content(input);
        assert_eq!(kept.len(), 2);
        assert_eq!(removed, 0);
    }

    #[test]
    fn empty_input_is_fine() {
        let (kept, removed) = dedup_by_content(Vec::new());
        assert!(kept.is_empty());
        assert_eq!(removed, 0);
    }
}
