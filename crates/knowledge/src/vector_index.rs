//! Vector index abstraction and the in-memory flat index.
//!
//! Similarity is cosine similarity. Both search modes are deterministic:
//! ties are broken by insertion order.

use crate::error::{KnowledgeError, KnowledgeResult};
use crate::types::{IndexSnapshot, IndexedChunk, ScoredChunk};

/// Trait for vector index backends.
pub trait VectorIndex: Send + Sync {
    /// Number of indexed chunks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimensionality, or `None` for an empty index.
    fn dimensions(&self) -> Option<usize>;

    /// Plain top-k by descending similarity.
    fn search(&self, query: &[f32], k: usize) -> KnowledgeResult<Vec<ScoredChunk>>;

    /// Maximal marginal relevance over the `fetch_k` nearest candidates.
    ///
    /// `lambda` weighs query similarity against similarity to chunks already
    /// selected; 1.0 degenerates to plain top-k.
    fn search_mmr(
        &self,
        query: &[f32],
        k: usize,
        fetch_k: usize,
        lambda: f32,
    ) -> KnowledgeResult<Vec<ScoredChunk>>;
}

/// Cosine similarity of two equal-length vectors. Zero if either is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Brute-force index over chunks kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    chunks: Vec<IndexedChunk>,
    dimensions: Option<usize>,
}

impl FlatIndex {
    /// Build an index, requiring every vector to share one dimensionality.
    pub fn build(chunks: Vec<IndexedChunk>) -> KnowledgeResult<Self> {
        let dimensions = chunks.first().map(|c| c.vector.len());

        if let Some(dim) = dimensions {
            if let Some(bad) = chunks.iter().find(|c| c.vector.len() != dim) {
                return Err(KnowledgeError::EmbeddingFailure(format!(
                    "chunk {}#{} has {} dimensions, expected {}",
                    bad.chunk.source,
                    bad.chunk.sequence_index,
                    bad.vector.len(),
                    dim
                )));
            }
        }

        Ok(Self { chunks, dimensions })
    }

    pub fn from_snapshot(snapshot: &IndexSnapshot) -> KnowledgeResult<Self> {
        Self::build(snapshot.indexed_chunks.clone())
    }

    fn check_query(&self, query: &[f32], k: usize) -> KnowledgeResult<()> {
        if k == 0 {
            return Err(KnowledgeError::InvalidSearchParams(
                "k must be positive".to_string(),
            ));
        }
        if let Some(dim) = self.dimensions {
            if query.len() != dim {
                return Err(KnowledgeError::EmbeddingFailure(format!(
                    "query has {} dimensions, index has {}",
                    query.len(),
                    dim
                )));
            }
        }
        Ok(())
    }

    /// Every chunk's (position, similarity), most similar first.
    fn ranked(&self, query: &[f32]) -> Vec<(usize, f32)> {
        let mut ranked: Vec<(usize, f32)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, c)| (i, cosine_similarity(query, &c.vector)))
            .collect();

        // Stable sort keeps insertion order among equal scores
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    fn scored(&self, idx: usize, score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: self.chunks[idx].chunk.clone(),
            score,
        }
    }
}

impl VectorIndex for FlatIndex {
    fn len(&self) -> usize {
        self.chunks.len()
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    fn search(&self, query: &[f32], k: usize) -> KnowledgeResult<Vec<ScoredChunk>> {
        self.check_query(query, k)?;

        Ok(self
            .ranked(query)
            .into_iter()
            .take(k)
            .map(|(idx, score)| self.scored(idx, score))
            .collect())
    }

    fn search_mmr(
        &self,
        query: &[f32],
        k: usize,
        fetch_k: usize,
        lambda: f32,
    ) -> KnowledgeResult<Vec<ScoredChunk>> {
        self.check_query(query, k)?;
        if fetch_k < k {
            return Err(KnowledgeError::InvalidSearchParams(format!(
                "fetch_k ({}) must be at least k ({})",
                fetch_k, k
            )));
        }
        if !(0.0..=1.0).contains(&lambda) {
            return Err(KnowledgeError::InvalidSearchParams(format!(
                "lambda ({}) must lie in [0, 1]",
                lambda
            )));
        }

        // Already ordered by query similarity, then insertion order
        let mut remaining: Vec<(usize, f32)> =
            self.ranked(query).into_iter().take(fetch_k).collect();
        let mut selected: Vec<(usize, f32)> = Vec::with_capacity(k.min(remaining.len()));

        while selected.len() < k && !remaining.is_empty() {
            let mut best: Option<(usize, f32)> = None;

            for (pos, &(idx, query_sim)) in remaining.iter().enumerate() {
                let redundancy = selected
                    .iter()
                    .map(|&(s, _)| cosine_similarity(&self.chunks[idx].vector, &self.chunks[s].vector))
                    .fold(None, |acc: Option<f32>, sim| Some(acc.map_or(sim, |a| a.max(sim))))
                    .unwrap_or(0.0);

                let score = lambda * query_sim - (1.0 - lambda) * redundancy;
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((pos, score));
                }
            }

            match best {
                Some((pos, _)) => selected.push(remaining.remove(pos)),
                None => break,
            }
        }

        Ok(selected
            .into_iter()
            .map(|(idx, score)| self.scored(idx, score))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn indexed(source: &str, seq: u32, vector: Vec<f32>) -> IndexedChunk {
        IndexedChunk {
            chunk: Chunk {
                text: format!("{}#{}", source, seq),
                source: source.to_string(),
                sequence_index: seq,
                span: (0, 0),
            },
            vector,
        }
    }

    fn texts(hits: &[ScoredChunk]) -> Vec<String> {
        hits.iter().map(|h| h.chunk.text.clone()).collect()
    }

    /// Three near-duplicates close to the query and one distinct chunk.
    fn duplicate_cluster() -> FlatIndex {
        FlatIndex::build(vec![
            indexed("dup.txt", 0, vec![1.0, 0.0, 0.0]),
            indexed("dup.txt", 1, vec![0.99, 0.01, 0.0]),
            indexed("dup.txt", 2, vec![0.98, 0.02, 0.0]),
            indexed("other.txt", 0, vec![0.0, 0.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_build_rejects_mixed_dimensions() {
        let result = FlatIndex::build(vec![
            indexed("a.txt", 0, vec![1.0, 0.0]),
            indexed("a.txt", 1, vec![1.0]),
        ]);
        assert!(matches!(result, Err(KnowledgeError::EmbeddingFailure(_))));
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let index = FlatIndex::build(vec![
            indexed("a.txt", 0, vec![0.0, 1.0]),
            indexed("a.txt", 1, vec![1.0, 0.0]),
            indexed("a.txt", 2, vec![0.7, 0.7]),
        ])
        .unwrap();

        let hits = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(texts(&hits), vec!["a.txt#1", "a.txt#2"]);
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_search_ties_keep_insertion_order() {
        let index = FlatIndex::build(vec![
            indexed("a.txt", 0, vec![1.0, 0.0]),
            indexed("b.txt", 0, vec![1.0, 0.0]),
            indexed("c.txt", 0, vec![1.0, 0.0]),
        ])
        .unwrap();

        let hits = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(texts(&hits), vec!["a.txt#0", "b.txt#0", "c.txt#0"]);
    }

    #[test]
    fn test_k_larger_than_index_returns_all() {
        let index = duplicate_cluster();
        assert_eq!(index.search(&[1.0, 0.0, 0.0], 10).unwrap().len(), 4);
        assert_eq!(index.search_mmr(&[1.0, 0.0, 0.0], 10, 10, 0.5).unwrap().len(), 4);
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = FlatIndex::build(Vec::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.search(&[1.0], 3).unwrap().is_empty());
        assert!(index.search_mmr(&[1.0], 3, 10, 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_params() {
        let index = duplicate_cluster();
        assert!(matches!(
            index.search(&[1.0, 0.0, 0.0], 0),
            Err(KnowledgeError::InvalidSearchParams(_))
        ));
        assert!(matches!(
            index.search_mmr(&[1.0, 0.0, 0.0], 3, 2, 0.5),
            Err(KnowledgeError::InvalidSearchParams(_))
        ));
        assert!(matches!(
            index.search(&[1.0, 0.0], 1),
            Err(KnowledgeError::EmbeddingFailure(_))
        ));
    }

    #[test]
    fn test_mmr_reaches_past_duplicates() {
        let index = duplicate_cluster();
        let query = [1.0, 0.0, 0.6];

        let plain = index.search(&query, 2).unwrap();
        assert!(plain.iter().all(|h| h.chunk.source == "dup.txt"));

        let mmr = index.search_mmr(&query, 2, 10, 0.5).unwrap();
        assert_eq!(mmr[0].chunk.text, "dup.txt#0");
        assert!(mmr.iter().any(|h| h.chunk.source == "other.txt"));
    }

    #[test]
    fn test_mmr_lambda_one_matches_plain_search() {
        let index = duplicate_cluster();
        let query = [1.0, 0.0, 0.6];

        assert_eq!(
            texts(&index.search_mmr(&query, 3, 10, 1.0).unwrap()),
            texts(&index.search(&query, 3).unwrap())
        );
    }

    #[test]
    fn test_mmr_candidate_pool_is_limited() {
        let index = duplicate_cluster();
        let mmr = index.search_mmr(&[1.0, 0.0, 0.6], 2, 3, 0.5).unwrap();
        assert!(mmr.iter().all(|h| h.chunk.source == "dup.txt"));
    }

    #[test]
    fn test_repeated_searches_are_identical() {
        let index = duplicate_cluster();
        let query = [1.0, 0.0, 0.6];

        assert_eq!(index.search(&query, 3).unwrap(), index.search(&query, 3).unwrap());
        assert_eq!(
            index.search_mmr(&query, 3, 10, 0.5).unwrap(),
            index.search_mmr(&query, 3, 10, 0.5).unwrap()
        );
    }
}
