//! Persisted index lifecycle: reuse the stored snapshot or rebuild it.
//!
//! Storage layout inside the index directory:
//! - `index.json`: the encoded [`IndexSnapshot`]
//! - `fingerprint.txt`: hex digest of the corpus the snapshot was built from
//!
//! The fingerprint file is written only after the snapshot is durably in
//! place, and removed before a new snapshot is written, so a crash can never
//! leave a fingerprint vouching for a snapshot that does not exist.

use crate::chunker::Chunker;
use crate::config::CorpusConfig;
use crate::corpus::load_documents;
use crate::embeddings::{check_embedding, Embedder};
use crate::error::{KnowledgeError, KnowledgeResult};
use crate::fingerprint::compute_fingerprint;
use crate::types::{IndexReady, IndexSettings, IndexSnapshot, IndexedChunk, SnapshotOrigin};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILE: &str = "index.json";
pub const FINGERPRINT_FILE: &str = "fingerprint.txt";

/// Serialization contract for persisted snapshots.
pub trait SnapshotCodec: Send + Sync {
    fn encode(&self, snapshot: &IndexSnapshot) -> Result<Vec<u8>, String>;
    fn decode(&self, bytes: &[u8]) -> Result<IndexSnapshot, String>;
}

/// JSON snapshot encoding. Floats round-trip exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl SnapshotCodec for JsonCodec {
    fn encode(&self, snapshot: &IndexSnapshot) -> Result<Vec<u8>, String> {
        serde_json::to_vec(snapshot).map_err(|e| e.to_string())
    }

    fn decode(&self, bytes: &[u8]) -> Result<IndexSnapshot, String> {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }
}

/// Stateless service deciding between reuse and rebuild for one corpus and
/// one index directory.
pub struct IndexStore {
    corpus_dir: PathBuf,
    index_dir: PathBuf,
    extensions: Vec<String>,
    chunker: Chunker,
    codec: Box<dyn SnapshotCodec>,
}

impl IndexStore {
    pub fn new(corpus: &CorpusConfig, chunker: Chunker) -> Self {
        Self {
            corpus_dir: corpus.data_dir.clone(),
            index_dir: corpus.index_dir.clone(),
            extensions: corpus.extensions.clone(),
            chunker,
            codec: Box::new(JsonCodec),
        }
    }

    /// Replace the snapshot encoding.
    pub fn with_codec(mut self, codec: Box<dyn SnapshotCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.index_dir.join(SNAPSHOT_FILE)
    }

    pub fn fingerprint_path(&self) -> PathBuf {
        self.index_dir.join(FINGERPRINT_FILE)
    }

    /// Fingerprint of the corpus as it is on disk right now.
    pub fn current_fingerprint(&self) -> KnowledgeResult<String> {
        compute_fingerprint(&self.corpus_dir, &self.extensions)
    }

    /// Build settings that a stored snapshot must match to be reused.
    pub fn settings_for(&self, embedder: &dyn Embedder) -> IndexSettings {
        IndexSettings {
            chunk_size: self.chunker.chunk_size(),
            chunk_overlap: self.chunker.chunk_overlap(),
            embedding_provider: embedder.provider_name().to_string(),
            embedding_model: embedder.model_name().to_string(),
            dimensions: embedder.dimensions(),
        }
    }

    /// Return a snapshot for the current corpus, reusing the stored one when
    /// it is still valid and rebuilding otherwise.
    ///
    /// The reuse path never calls the embedder.
    pub fn ensure_ready(&self, embedder: &dyn Embedder) -> KnowledgeResult<IndexReady> {
        let current = self.current_fingerprint()?;
        self.ensure_ready_for(&current, embedder)
    }

    /// Same as [`IndexStore::ensure_ready`] with a precomputed fingerprint.
    pub fn ensure_ready_for(
        &self,
        current: &str,
        embedder: &dyn Embedder,
    ) -> KnowledgeResult<IndexReady> {
        let settings = self.settings_for(embedder);

        if let Some(snapshot) = self.load_reusable(current, &settings) {
            tracing::info!(
                "Reusing stored index ({} chunks, fingerprint {})",
                snapshot.len(),
                short(current)
            );
            return Ok(IndexReady {
                snapshot,
                origin: SnapshotOrigin::Reused,
            });
        }

        self.rebuild_for(current, settings, embedder)
    }

    /// Rebuild from scratch regardless of what is stored.
    pub fn rebuild(&self, embedder: &dyn Embedder) -> KnowledgeResult<IndexReady> {
        let current = self.current_fingerprint()?;
        let settings = self.settings_for(embedder);
        self.rebuild_for(&current, settings, embedder)
    }

    /// The persisted fingerprint, if one exists.
    pub fn stored_fingerprint(&self) -> KnowledgeResult<Option<String>> {
        let path = self.fingerprint_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| KnowledgeError::StorageRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(content.trim().to_string()))
    }

    /// Decode the persisted snapshot, if one exists.
    pub fn load_snapshot(&self) -> KnowledgeResult<Option<IndexSnapshot>> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|e| KnowledgeError::StorageRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let snapshot = self
            .codec
            .decode(&bytes)
            .map_err(|reason| KnowledgeError::StorageRead { path, reason })?;
        Ok(Some(snapshot))
    }

    /// The stored snapshot if every reuse condition holds.
    fn load_reusable(&self, current: &str, settings: &IndexSettings) -> Option<IndexSnapshot> {
        let stored = match self.stored_fingerprint() {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                tracing::info!("No stored fingerprint in {:?}; building index", self.index_dir);
                return None;
            }
            Err(e) => {
                tracing::warn!("{}; rebuilding", e);
                return None;
            }
        };

        if stored != current {
            tracing::info!(
                "Corpus changed (stored {}, current {}); rebuilding",
                short(&stored),
                short(current)
            );
            return None;
        }

        let snapshot = match self.load_snapshot() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::warn!("Fingerprint present but {} missing; rebuilding", SNAPSHOT_FILE);
                return None;
            }
            Err(e) => {
                tracing::warn!("{}; rebuilding", e);
                return None;
            }
        };

        if snapshot.fingerprint != current {
            tracing::warn!("Stored snapshot belongs to another corpus state; rebuilding");
            return None;
        }

        if &snapshot.settings != settings {
            tracing::info!(
                "Index settings changed ({:?} -> {:?}); rebuilding",
                snapshot.settings,
                settings
            );
            return None;
        }

        Some(snapshot)
    }

    fn rebuild_for(
        &self,
        current: &str,
        settings: IndexSettings,
        embedder: &dyn Embedder,
    ) -> KnowledgeResult<IndexReady> {
        let snapshot = self.build_snapshot(current, settings, embedder)?;

        if let Err(err) = self.persist(&snapshot) {
            tracing::warn!("{}; keeping rebuilt index in memory", err);
            return Err(match err {
                KnowledgeError::StorageWrite { path, reason, .. } => KnowledgeError::StorageWrite {
                    path,
                    reason,
                    snapshot: Some(Box::new(snapshot)),
                },
                other => other,
            });
        }

        tracing::info!(
            "Rebuilt index: {} chunks, fingerprint {}",
            snapshot.len(),
            short(current)
        );

        Ok(IndexReady {
            snapshot,
            origin: SnapshotOrigin::Rebuilt,
        })
    }

    fn build_snapshot(
        &self,
        current: &str,
        settings: IndexSettings,
        embedder: &dyn Embedder,
    ) -> KnowledgeResult<IndexSnapshot> {
        let documents = load_documents(&self.corpus_dir, &self.extensions)?;
        let chunks = self.chunker.split(&documents);

        tracing::info!(
            "Embedding {} chunks from {} documents with '{}' (model: {})",
            chunks.len(),
            documents.len(),
            embedder.provider_name(),
            embedder.model_name()
        );

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&texts)?
        };

        if vectors.len() != chunks.len() {
            return Err(KnowledgeError::EmbeddingFailure(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let indexed_chunks = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                check_embedding(&vector, settings.dimensions)?;
                Ok(IndexedChunk { chunk, vector })
            })
            .collect::<KnowledgeResult<Vec<_>>>()?;

        Ok(IndexSnapshot::new(
            current.to_string(),
            settings,
            indexed_chunks,
        ))
    }

    /// Write snapshot then fingerprint, each atomically.
    fn persist(&self, snapshot: &IndexSnapshot) -> KnowledgeResult<()> {
        let write_err = |path: &Path, reason: String| KnowledgeError::StorageWrite {
            path: path.to_path_buf(),
            reason,
            snapshot: None,
        };

        fs::create_dir_all(&self.index_dir).map_err(|e| write_err(&self.index_dir, e.to_string()))?;

        let fingerprint_path = self.fingerprint_path();
        if fingerprint_path.exists() {
            fs::remove_file(&fingerprint_path)
                .map_err(|e| write_err(&fingerprint_path, e.to_string()))?;
        }

        let snapshot_path = self.snapshot_path();
        let bytes = self
            .codec
            .encode(snapshot)
            .map_err(|reason| write_err(&snapshot_path, reason))?;
        write_atomic(&snapshot_path, &bytes).map_err(|e| write_err(&snapshot_path, e.to_string()))?;

        write_atomic(&fingerprint_path, snapshot.fingerprint.as_bytes())
            .map_err(|e| write_err(&fingerprint_path, e.to_string()))?;

        tracing::debug!("Persisted index to {:?}", self.index_dir);
        Ok(())
    }
}

/// Write to a sibling temp file, fsync, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!("{}.tmp", file_name));

    let result = File::create(&tmp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, path)
    });

    if result.is_err() && tmp.exists() {
        if let Err(e) = fs::remove_file(&tmp) {
            tracing::warn!("Failed to remove temp file {:?}: {}", tmp, e);
        }
    }

    result
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
