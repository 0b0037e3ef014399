//! Query entry point: keeps one snapshot loaded and searches it.

use crate::chunker::Chunker;
use crate::config::{default_fetch_k, RagConfig, RetrievalConfig};
use crate::embeddings::{check_embedding, create_embedder, Embedder};
use crate::error::{KnowledgeError, KnowledgeResult};
use crate::store::IndexStore;
use crate::types::{IndexReady, IndexSnapshot, Retrieval, SnapshotOrigin};
use crate::vector_index::{FlatIndex, VectorIndex};
use std::sync::Arc;

struct Loaded {
    snapshot: IndexSnapshot,
    index: FlatIndex,
    origin: SnapshotOrigin,
}

/// Combines the index store and the vector index behind `search(query)`.
///
/// The retriever owns exactly one snapshot at a time. It consults the store
/// on first use and afterwards only when the corpus fingerprint changes, so a
/// given corpus state is never rebuilt twice.
pub struct Retriever {
    store: IndexStore,
    embedder: Arc<dyn Embedder>,
    retrieval: RetrievalConfig,
    loaded: Option<Loaded>,
}

impl Retriever {
    /// Validates the configuration up front; no I/O happens here.
    pub fn new(config: &RagConfig, embedder: Arc<dyn Embedder>) -> KnowledgeResult<Self> {
        config.validate()?;
        let chunker = Chunker::from_config(&config.chunking)?;

        Ok(Self {
            store: IndexStore::new(&config.corpus, chunker),
            embedder,
            retrieval: config.retrieval,
            loaded: None,
        })
    }

    /// Build the retriever with the embedder named in the configuration.
    pub fn from_config(config: &RagConfig) -> KnowledgeResult<Self> {
        let embedder = create_embedder(&config.embedding)?;
        Self::new(config, embedder)
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn retrieval_config(&self) -> &RetrievalConfig {
        &self.retrieval
    }

    /// The snapshot currently held, if any.
    pub fn snapshot(&self) -> Option<&IndexSnapshot> {
        self.loaded.as_ref().map(|l| &l.snapshot)
    }

    /// Load or build the index once. Later calls are no-ops.
    ///
    /// A `StorageWrite` failure is returned, but the rebuilt snapshot is
    /// installed first and serves subsequent searches.
    pub fn ensure_ready(&mut self) -> KnowledgeResult<SnapshotOrigin> {
        if let Some(loaded) = &self.loaded {
            return Ok(loaded.origin);
        }

        let result = self.store.ensure_ready(self.embedder.as_ref());
        self.install(result)
    }

    /// Re-check the corpus and reload only if its fingerprint changed.
    pub fn refresh(&mut self) -> KnowledgeResult<SnapshotOrigin> {
        let current = self.store.current_fingerprint()?;

        if let Some(loaded) = &self.loaded {
            if loaded.snapshot.fingerprint == current {
                tracing::debug!("Corpus unchanged; keeping loaded index");
                return Ok(loaded.origin);
            }
        }

        let result = self.store.ensure_ready_for(&current, self.embedder.as_ref());
        self.install(result)
    }

    /// Rebuild regardless of the stored fingerprint.
    pub fn rebuild(&mut self) -> KnowledgeResult<SnapshotOrigin> {
        let result = self.store.rebuild(self.embedder.as_ref());
        self.install(result)
    }

    fn install(&mut self, result: KnowledgeResult<IndexReady>) -> KnowledgeResult<SnapshotOrigin> {
        match result {
            Ok(ready) => {
                let index = FlatIndex::from_snapshot(&ready.snapshot)?;
                self.loaded = Some(Loaded {
                    snapshot: ready.snapshot,
                    index,
                    origin: ready.origin,
                });
                Ok(ready.origin)
            }
            Err(mut err) => {
                if let Some(snapshot) = err.take_snapshot() {
                    let index = FlatIndex::from_snapshot(&snapshot)?;
                    self.loaded = Some(Loaded {
                        snapshot,
                        index,
                        origin: SnapshotOrigin::Rebuilt,
                    });
                }
                Err(err)
            }
        }
    }

    /// Search with the configured `k` and selection mode.
    pub fn search(&mut self, query: &str) -> KnowledgeResult<Retrieval> {
        let RetrievalConfig { k, use_mmr, .. } = self.retrieval;
        self.search_with(query, k, use_mmr)
    }

    /// Search with an explicit `k` and selection mode.
    pub fn search_with(&mut self, query: &str, k: usize, use_mmr: bool) -> KnowledgeResult<Retrieval> {
        if k == 0 {
            return Err(KnowledgeError::InvalidSearchParams(
                "k must be positive".to_string(),
            ));
        }

        self.ensure_ready()?;
        let loaded = self.loaded.as_ref().ok_or_else(|| {
            KnowledgeError::Config("index was not loaded".to_string())
        })?;

        let query_vector = self.embedder.embed(query)?;
        check_embedding(&query_vector, self.embedder.dimensions())?;

        let chunks = if use_mmr {
            let fetch_k = self
                .retrieval
                .fetch_k
                .unwrap_or_else(|| default_fetch_k(k));
            loaded
                .index
                .search_mmr(&query_vector, k, fetch_k, self.retrieval.mmr_lambda)?
        } else {
            loaded.index.search(&query_vector, k)?
        };

        tracing::debug!(
            "Retrieved {} chunks for query ({} mode)",
            chunks.len(),
            if use_mmr { "mmr" } else { "top-k" }
        );

        Ok(Retrieval { chunks, used_mmr: use_mmr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace(files: &[(&str, &str)]) -> (TempDir, RagConfig) {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        fs::create_dir(&data).unwrap();
        for (name, content) in files {
            fs::write(data.join(name), content).unwrap();
        }
        let config = RagConfig::for_workspace(temp.path());
        (temp, config)
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let (_temp, mut config) = workspace(&[]);
        config.retrieval.k = 0;
        assert!(matches!(
            Retriever::from_config(&config),
            Err(KnowledgeError::InvalidSearchParams(_))
        ));
    }

    #[test]
    fn test_ensure_ready_runs_once() {
        let (_temp, config) = workspace(&[("guide.txt", "Breathe slowly.")]);
        let mut retriever = Retriever::from_config(&config).unwrap();

        assert_eq!(retriever.ensure_ready().unwrap(), SnapshotOrigin::Rebuilt);
        assert_eq!(retriever.ensure_ready().unwrap(), SnapshotOrigin::Rebuilt);
        assert_eq!(retriever.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_search_reports_mode() {
        let (_temp, config) = workspace(&[("guide.txt", "Urge surfing: wait 10 minutes.")]);
        let mut retriever = Retriever::from_config(&config).unwrap();

        assert!(retriever.search("urge").unwrap().used_mmr);
        assert!(!retriever.search_with("urge", 1, false).unwrap().used_mmr);
    }

    #[test]
    fn test_search_zero_k_rejected() {
        let (_temp, config) = workspace(&[("guide.txt", "Breathe.")]);
        let mut retriever = Retriever::from_config(&config).unwrap();
        assert!(matches!(
            retriever.search_with("urge", 0, true),
            Err(KnowledgeError::InvalidSearchParams(_))
        ));
    }

    #[test]
    fn test_refresh_picks_up_changes() {
        let (temp, config) = workspace(&[("guide.txt", "Breathe slowly.")]);
        let mut retriever = Retriever::from_config(&config).unwrap();
        retriever.ensure_ready().unwrap();
        let before = retriever.snapshot().unwrap().fingerprint.clone();

        assert_eq!(retriever.refresh().unwrap(), SnapshotOrigin::Rebuilt);
        assert_eq!(retriever.snapshot().unwrap().fingerprint, before);

        fs::write(temp.path().join("data").join("guide.txt"), "Call a friend.").unwrap();
        retriever.refresh().unwrap();
        assert_ne!(retriever.snapshot().unwrap().fingerprint, before);
    }
}
