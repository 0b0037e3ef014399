//! Embedder trait and factory.

use crate::embeddings::config::EmbeddingConfig;
use crate::embeddings::providers::{HashEmbedder, TrigramEmbedder};
use crate::error::{KnowledgeError, KnowledgeResult};
use crate::types::Vector;
use std::sync::Arc;

/// Maps text to a fixed-length vector.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector, and every vector has exactly `dimensions()` entries.
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// Provider name (e.g. "hash", "trigram")
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;

    fn dimensions(&self) -> usize;

    /// Embed a single text.
    fn embed(&self, text: &str) -> KnowledgeResult<Vector>;

    /// Embed many texts, preserving order.
    fn embed_batch(&self, texts: &[&str]) -> KnowledgeResult<Vec<Vector>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Reject vectors of the wrong length or with non-finite entries.
pub fn check_embedding(vector: &[f32], dimensions: usize) -> KnowledgeResult<()> {
    if vector.len() != dimensions {
        return Err(KnowledgeError::EmbeddingFailure(format!(
            "expected {} dimensions, got {}",
            dimensions,
            vector.len()
        )));
    }
    if let Some(pos) = vector.iter().position(|v| !v.is_finite()) {
        return Err(KnowledgeError::EmbeddingFailure(format!(
            "non-finite value at position {}",
            pos
        )));
    }
    Ok(())
}

/// Create an embedder based on configuration.
pub fn create_embedder(config: &EmbeddingConfig) -> KnowledgeResult<Arc<dyn Embedder>> {
    config.validate()?;

    let embedder: Arc<dyn Embedder> = match config.provider.as_str() {
        "hash" => Arc::new(HashEmbedder::new(config.dimensions)),
        "trigram" => Arc::new(TrigramEmbedder::new(config.dimensions)),
        other => {
            return Err(KnowledgeError::Config(format!(
                "Unknown embedding provider: '{}'. Supported providers: hash, trigram",
                other
            )))
        }
    };

    if let Some(model) = config.model.as_deref() {
        if model != embedder.model_name() {
            return Err(KnowledgeError::Config(format!(
                "Provider '{}' does not offer model '{}' (available: {})",
                config.provider,
                model,
                embedder.model_name()
            )));
        }
    }

    tracing::debug!(
        "Created embedder: provider={}, model={}, dimensions={}",
        embedder.provider_name(),
        embedder.model_name(),
        embedder.dimensions()
    );

    Ok(embedder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_hash_embedder() {
        let embedder = create_embedder(&EmbeddingConfig::default()).unwrap();
        assert_eq!(embedder.provider_name(), "hash");
        assert_eq!(embedder.model_name(), "hash-v1");
        assert_eq!(embedder.dimensions(), 128);
    }

    #[test]
    fn test_create_trigram_embedder() {
        let config = EmbeddingConfig {
            provider: "trigram".to_string(),
            model: Some("trigram-v1".to_string()),
            dimensions: 64,
        };
        let embedder = create_embedder(&config).unwrap();
        assert_eq!(embedder.provider_name(), "trigram");
        assert_eq!(embedder.embed("hello world").unwrap().len(), 64);
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = EmbeddingConfig {
            provider: "unknown".to_string(),
            ..Default::default()
        };
        let err = create_embedder(&config).unwrap_err();
        assert!(err.to_string().contains("Unknown embedding provider"));
    }

    #[test]
    fn test_mismatched_model_rejected() {
        let config = EmbeddingConfig {
            model: Some("trigram-v1".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            create_embedder(&config),
            Err(KnowledgeError::Config(_))
        ));
    }

    #[test]
    fn test_check_embedding() {
        assert!(check_embedding(&[0.0, 1.0], 2).is_ok());
        assert!(matches!(
            check_embedding(&[0.0], 2),
            Err(KnowledgeError::EmbeddingFailure(_))
        ));
        assert!(matches!(
            check_embedding(&[0.0, f32::NAN], 2),
            Err(KnowledgeError::EmbeddingFailure(_))
        ));
    }

    #[test]
    fn test_default_batch_preserves_order() {
        let embedder = create_embedder(&EmbeddingConfig::default()).unwrap();
        let batch = embedder.embed_batch(&["urge", "craving"]).unwrap();
        assert_eq!(batch[0], embedder.embed("urge").unwrap());
        assert_eq!(batch[1], embedder.embed("craving").unwrap());
    }
}
