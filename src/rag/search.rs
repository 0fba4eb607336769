//! Exact nearest-neighbor retrieval over an owner's chunks.
//!
//! Deliberately a full scan plus stable sort, no ANN index: at this tier the
//! candidate set is one owner's documents and exactness beats index upkeep.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::entities::ChunkWithDocument;
use crate::domain::repositories::{ChunkRepository, RepositoryError};

/// Cosine similarity of two vectors, `0.0` when either norm is zero or the
/// lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 { 0.0 } else { dot / denom }
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk: ChunkWithDocument,
    pub score: f32,
}

/// Rank all chunks owned by `owner_sub` against `query` and return the top
/// `top_k` by cosine similarity, descending.
///
/// Owner scoping happens in the store query, so cross-owner chunks are never
/// in the candidate set. Ties keep the store's scan order (stable sort) and
/// `top_k` larger than the candidate count simply returns everything.
pub async fn search(
    chunks: &Arc<dyn ChunkRepository>,
    owner_sub: &str,
    query: &[f32],
    top_k: usize,
) -> Result<Vec<SearchHit>, RepositoryError> {
    let candidates = chunks.list_by_owner(owner_sub).await?;

    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .map(|chunk| {
            let score = cosine_similarity(query, &chunk.embedding);
            SearchHit { chunk, score }
        })
        .collect();

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits.truncate(top_k);

    Ok(hits)
}
