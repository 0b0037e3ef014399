//! Retrieval core for UrgeEase.
//!
//! Turns a directory of plain-text coping guides into a searchable index and
//! answers queries against it:
//!
//! - [`fingerprint`]: content hash of the corpus deciding reuse vs rebuild
//! - [`store`]: persisted snapshot lifecycle
//! - [`chunker`], [`embeddings`], [`vector_index`]: the build pipeline
//! - [`retriever`]: top-k and MMR search over the loaded snapshot
//! - [`rag`]: crisis gate, prompt assembly and model call
//!
//! Everything except the model call is synchronous.

pub mod chunker;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod error;
pub mod fingerprint;
pub mod rag;
pub mod retriever;
pub mod store;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chunker::Chunker;
pub use config::{load_config, RagConfig};
pub use embeddings::{create_embedder, Embedder, EmbeddingConfig, HashEmbedder};
pub use error::{KnowledgeError, KnowledgeResult};
pub use fingerprint::compute_fingerprint;
pub use rag::{CrisisGate, RagChain, RagResponse, CRISIS_MESSAGE};
pub use retriever::Retriever;
pub use store::{IndexStore, JsonCodec, SnapshotCodec};
pub use types::{
    Chunk, CorpusStats, Document, FileStats, IndexReady, IndexSettings, IndexSnapshot,
    IndexedChunk, Retrieval, ScoredChunk, SnapshotOrigin,
};
pub use vector_index::{FlatIndex, VectorIndex};
