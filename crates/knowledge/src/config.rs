//! Retrieval pipeline configuration.
//!
//! All defaults are enumerated here. The YAML file shared with the core crate
//! (`.urgeease/config.yaml`) may override any of them; missing keys keep
//! their defaults and unknown keys are ignored.

use crate::embeddings::EmbeddingConfig;
use crate::error::{KnowledgeError, KnowledgeResult};
use crate::rag::crisis::DEFAULT_CRISIS_KEYWORDS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use urgeease_llm::GenerationConfig;

/// Complete configuration of the retrieval core and RAG chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagConfig {
    #[serde(default)]
    pub corpus: CorpusConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub safety: SafetyConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    /// Optional YAML prompt template overriding the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<PathBuf>,
}

/// Where the corpus and the persisted index live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory of plain-text documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding the persisted index and fingerprint
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Accepted file extensions, matched case-insensitively
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("vectorstore")
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_dir: default_index_dir(),
            extensions: default_extensions(),
        }
    }
}

/// Chunk size and overlap, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    800
}

fn default_chunk_overlap() -> usize {
    150
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> KnowledgeResult<()> {
        if self.chunk_size == 0 {
            return Err(KnowledgeError::InvalidChunkConfig(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(KnowledgeError::InvalidChunkConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// How many chunks to return and how to pick them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks returned per query
    #[serde(default = "default_k")]
    pub k: usize,

    /// Use maximal marginal relevance instead of plain top-k
    #[serde(default = "default_use_mmr")]
    pub use_mmr: bool,

    /// MMR candidate pool; `max(10, 3k)` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_k: Option<usize>,

    /// Relevance/diversity trade-off for MMR, in `[0, 1]`
    #[serde(default = "default_mmr_lambda")]
    pub mmr_lambda: f32,
}

fn default_k() -> usize {
    4
}

fn default_use_mmr() -> bool {
    true
}

fn default_mmr_lambda() -> f32 {
    0.5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            use_mmr: default_use_mmr(),
            fetch_k: None,
            mmr_lambda: default_mmr_lambda(),
        }
    }
}

impl RetrievalConfig {
    /// Candidate pool size for MMR.
    pub fn effective_fetch_k(&self) -> usize {
        self.fetch_k.unwrap_or_else(|| default_fetch_k(self.k))
    }

    pub fn validate(&self) -> KnowledgeResult<()> {
        if self.k == 0 {
            return Err(KnowledgeError::InvalidSearchParams(
                "k must be positive".to_string(),
            ));
        }
        if self.effective_fetch_k() < self.k {
            return Err(KnowledgeError::InvalidSearchParams(format!(
                "fetch_k ({}) must be at least k ({})",
                self.effective_fetch_k(),
                self.k
            )));
        }
        if !(0.0..=1.0).contains(&self.mmr_lambda) {
            return Err(KnowledgeError::InvalidSearchParams(format!(
                "mmr_lambda ({}) must lie in [0, 1]",
                self.mmr_lambda
            )));
        }
        Ok(())
    }
}

/// Default MMR candidate pool for a given `k`.
pub fn default_fetch_k(k: usize) -> usize {
    10.max(k.saturating_mul(3))
}

/// Crisis gate keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyConfig {
    #[serde(default = "default_crisis_keywords")]
    pub crisis_keywords: Vec<String>,
}

fn default_crisis_keywords() -> Vec<String> {
    DEFAULT_CRISIS_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            crisis_keywords: default_crisis_keywords(),
        }
    }
}

impl RagConfig {
    /// Default configuration with corpus paths anchored at `workspace`.
    pub fn for_workspace(workspace: &Path) -> Self {
        let mut config = Self::default();
        config.resolve_paths(workspace);
        config
    }

    /// Make relative corpus paths relative to `workspace`.
    pub fn resolve_paths(&mut self, workspace: &Path) {
        if self.corpus.data_dir.is_relative() {
            self.corpus.data_dir = workspace.join(&self.corpus.data_dir);
        }
        if self.corpus.index_dir.is_relative() {
            self.corpus.index_dir = workspace.join(&self.corpus.index_dir);
        }
        if let Some(template) = self.prompt_template.as_mut() {
            if template.is_relative() {
                *template = workspace.join(&*template);
            }
        }
    }

    /// Reject configurations that can never work. Nothing is clamped.
    pub fn validate(&self) -> KnowledgeResult<()> {
        self.chunking.validate()?;
        self.retrieval.validate()?;
        self.embedding.validate()?;
        if self.corpus.extensions.is_empty() {
            return Err(KnowledgeError::Config(
                "at least one corpus extension is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the retrieval configuration for a workspace.
///
/// Reads `config_path` when it exists, otherwise uses defaults. Relative
/// paths are resolved against `workspace`, and the result is validated.
pub fn load_config(workspace: &Path, config_path: &Path) -> KnowledgeResult<RagConfig> {
    let mut config = if config_path.exists() {
        let content = fs::read_to_string(config_path).map_err(|e| {
            KnowledgeError::Config(format!("Failed to read config at {:?}: {}", config_path, e))
        })?;

        let config: RagConfig = serde_yaml::from_str(&content).map_err(|e| {
            KnowledgeError::Config(format!("Failed to parse config at {:?}: {}", config_path, e))
        })?;

        tracing::debug!("Loaded retrieval config from {:?}", config_path);
        config
    } else {
        tracing::debug!(
            "Using default retrieval config (no config file at {:?})",
            config_path
        );
        RagConfig::default()
    };

    config.resolve_paths(workspace);
    config.validate()?;
    Ok(config)
}
