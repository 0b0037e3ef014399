//! Embedding configuration.

use crate::error::{KnowledgeError, KnowledgeResult};
use serde::{Deserialize, Serialize};

/// Which embedder to build and with how many dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbeddingConfig {
    /// Provider name: "hash" or "trigram"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier; the provider's own model when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Embedding vector dimensions
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

fn default_provider() -> String {
    "hash".to_string()
}

fn default_dimensions() -> usize {
    128
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            dimensions: default_dimensions(),
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> KnowledgeResult<()> {
        if self.dimensions == 0 {
            return Err(KnowledgeError::Config(
                "embedding dimensions must be positive".to_string(),
            ));
        }
        if self.provider.trim().is_empty() {
            return Err(KnowledgeError::Config(
                "embedding provider must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
