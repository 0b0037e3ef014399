//! Error taxonomy for the retrieval core.
//!
//! Every failure is deterministic given its inputs, so nothing here is
//! retried. Empty-but-successful results and failures stay distinguishable.

use crate::types::IndexSnapshot;
use std::path::PathBuf;
use thiserror::Error;
use urgeease_core::AppError;

/// Result type alias for retrieval operations.
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// Errors raised by the corpus, index and retrieval pipeline.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    /// Corpus directory missing or unreadable
    #[error("corpus unavailable at {path:?}: {reason}")]
    CorpusUnavailable { path: PathBuf, reason: String },

    /// Index directory not writable. The rebuilt snapshot is still usable in
    /// memory and travels with the error.
    #[error("failed to persist index to {path:?}: {reason}")]
    StorageWrite {
        path: PathBuf,
        reason: String,
        snapshot: Option<Box<IndexSnapshot>>,
    },

    /// Persisted index unreadable or undecodable
    #[error("failed to read index from {path:?}: {reason}")]
    StorageRead { path: PathBuf, reason: String },

    #[error("invalid chunk configuration: {0}")]
    InvalidChunkConfig(String),

    #[error("invalid search parameters: {0}")]
    InvalidSearchParams(String),

    /// Embedder failed or returned a malformed vector
    #[error("embedding failure: {0}")]
    EmbeddingFailure(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl KnowledgeError {
    /// Move the in-memory snapshot out of a `StorageWrite` error.
    ///
    /// Returns `None` for every other kind, or if it was already taken.
    pub fn take_snapshot(&mut self) -> Option<IndexSnapshot> {
        match self {
            KnowledgeError::StorageWrite { snapshot, .. } => snapshot.take().map(|s| *s),
            _ => None,
        }
    }

    /// Short, stable name of the error kind for reports and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            KnowledgeError::CorpusUnavailable { .. } => "CorpusUnavailable",
            KnowledgeError::StorageWrite { .. } => "StorageWriteError",
            KnowledgeError::StorageRead { .. } => "StorageReadError",
            KnowledgeError::InvalidChunkConfig(_) => "InvalidChunkConfig",
            KnowledgeError::InvalidSearchParams(_) => "InvalidSearchParams",
            KnowledgeError::EmbeddingFailure(_) => "EmbeddingFailure",
            KnowledgeError::Config(_) => "Config",
        }
    }
}

impl From<KnowledgeError> for AppError {
    fn from(err: KnowledgeError) -> Self {
        AppError::Knowledge(format!("[{}] {}", err.kind(), err))
    }
}
