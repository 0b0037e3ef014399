//! Bag-of-words hashing embedder.

use crate::embeddings::normalize;
use crate::embeddings::provider::Embedder;
use crate::error::KnowledgeResult;
use crate::types::Vector;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hashes each lowercase word token into one of `dimensions` buckets and
/// returns the L2-normalized count histogram.
///
/// Tokens are maximal runs of ASCII alphanumerics and apostrophes. Texts
/// sharing words get positive cosine similarity; texts with no tokens embed
/// to the zero vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
}

impl Embedder for HashEmbedder {
    fn provider_name(&self) -> &str {
        "hash"
    }

    fn model_name(&self) -> &str {
        "hash-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> KnowledgeResult<Vector> {
        let mut vector = vec![0.0; self.dimensions];
        if self.dimensions == 0 {
            return Ok(vector);
        }

        let lower = text.to_lowercase();
        for token in tokens(&lower) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        normalize(&mut vector);
        Ok(vector)
    }
}
