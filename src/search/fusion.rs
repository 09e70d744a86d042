//! Client-side reciprocal rank fusion
//!
//! Used when the cluster cannot fuse retriever branches itself. Each branch
//! contributes 1/(rank_constant + rank) per document; documents ranked high
//! across several branches accumulate the largest fused scores.

use std::collections::HashMap;

use crate::types::RawHit;

/// Matches the Elasticsearch RRF default
const RANK_CONSTANT: f32 = 60.0;

/// Fuse independently ranked branch lists into one list of at most `limit`
/// hits, deduplicated by document id. The fused score replaces the branch
/// scores, mirroring what the server-side RRF retriever reports as `_score`.
pub fn reciprocal_rank_fusion(branches: &[Vec<RawHit>], limit: usize) -> Vec<RawHit> {
    let mut fused: HashMap<String, (f32, RawHit)> = HashMap::new();

    for branch in branches {
        for (rank, hit) in branch.iter().enumerate() {
            let contribution = 1.0 / (RANK_CONSTANT + rank as f32 + 1.0);
            fused
                .entry(hit.id.clone())
                .and_modify(|(score, _)| *score += contribution)
                .or_insert_with(|| (contribution, hit.clone()));
        }
    }

    let mut results: Vec<RawHit> = fused
        .into_values()
        .map(|(score, mut hit)| {
            hit.score = score;
            hit
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    results.truncate(limit);
    results
}
