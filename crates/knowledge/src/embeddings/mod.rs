//! Deterministic text embedders.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{check_embedding, create_embedder, Embedder};
pub use providers::{HashEmbedder, TrigramEmbedder};

/// Scale a vector to unit length. A zero vector is left as is.
pub(crate) fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}
