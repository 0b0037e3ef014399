//! Retrieval core type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed-length embedding vector.
pub type Vector = Vec<f32>;

/// A corpus file loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Full text content
    pub text: String,

    /// Filename within the corpus directory
    pub source: String,
}

impl Document {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// A bounded, contiguous slice of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Raw slice of the document text
    pub text: String,

    /// Filename of the originating document
    pub source: String,

    /// Position within the document (0-indexed)
    pub sequence_index: u32,

    /// Byte range `[start, end)` in the original document
    pub span: (usize, usize),
}

/// A chunk together with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    pub vector: Vector,
}

/// Build settings a persisted index depends on besides the corpus itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub embedding_provider: String,
    pub embedding_model: String,
    pub dimensions: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 150,
            embedding_provider: "hash".to_string(),
            embedding_model: "hash-v1".to_string(),
            dimensions: 128,
        }
    }
}

/// Everything needed to serve searches for one corpus state.
///
/// Replaced wholesale on any corpus change; never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Hex digest of the corpus the snapshot was built from
    pub fingerprint: String,

    pub settings: IndexSettings,

    pub built_at: DateTime<Utc>,

    /// Chunks in insertion order (document order, then sequence index)
    pub indexed_chunks: Vec<IndexedChunk>,
}

impl IndexSnapshot {
    pub fn new(
        fingerprint: String,
        settings: IndexSettings,
        indexed_chunks: Vec<IndexedChunk>,
    ) -> Self {
        Self {
            fingerprint,
            settings,
            built_at: Utc::now(),
            indexed_chunks,
        }
    }

    pub fn len(&self) -> usize {
        self.indexed_chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexed_chunks.is_empty()
    }
}

/// Where a ready snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotOrigin {
    /// Loaded from storage; no embedding performed
    Reused,
    /// Built from the corpus and persisted
    Rebuilt,
}

/// Outcome of `IndexStore::ensure_ready`.
#[derive(Debug, Clone)]
pub struct IndexReady {
    pub snapshot: IndexSnapshot,
    pub origin: SnapshotOrigin,
}

/// A search hit with its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Result handed back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retrieval {
    /// Hits in returned order
    pub chunks: Vec<ScoredChunk>,

    /// Whether diversity-aware selection produced the order
    pub used_mmr: bool,
}

impl Retrieval {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Distinct source filenames in order of first appearance.
    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for hit in &self.chunks {
            if !sources.contains(&hit.chunk.source) {
                sources.push(hit.chunk.source.clone());
            }
        }
        sources
    }
}

/// Per-file corpus statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    pub source: String,
    pub chars: usize,
    pub words: usize,
    pub chunks: usize,
}

/// Corpus statistics with totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub files: Vec<FileStats>,
    pub total_chars: usize,
    pub total_words: usize,
    pub total_chunks: usize,
}
