//! Stats command handler.

use super::{print_json, rag_config};
use clap::Args;
use urgeease_core::{config::AppConfig, AppResult};
use urgeease_knowledge::corpus::corpus_stats;
use urgeease_knowledge::{Chunker, IndexStore};

/// Show corpus statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let rag = rag_config(config)?;
        let chunker = Chunker::from_config(&rag.chunking)?;
        let stats = corpus_stats(&rag.corpus.data_dir, &rag.corpus.extensions, &chunker)?;

        let store = IndexStore::new(&rag.corpus, chunker);
        let stored = store.stored_fingerprint()?;
        let current = store.current_fingerprint()?;
        let up_to_date = stored.as_deref() == Some(current.as_str());

        if self.json {
            return print_json(&serde_json::json!({
                "corpus": rag.corpus.data_dir,
                "stats": stats,
                "fingerprint": current,
                "index_up_to_date": up_to_date,
            }));
        }

        println!("Corpus: {}", rag.corpus.data_dir.display());
        for file in &stats.files {
            println!(
                "  {:<24} {:>8} chars {:>7} words {:>4} chunks",
                file.source, file.chars, file.words, file.chunks
            );
        }
        println!(
            "Total: {} files, {} chars, {} words, {} chunks (size {}, overlap {})",
            stats.files.len(),
            stats.total_chars,
            stats.total_words,
            stats.total_chunks,
            rag.chunking.chunk_size,
            rag.chunking.chunk_overlap
        );
        println!(
            "Index: {}",
            if up_to_date { "up to date" } else { "needs rebuild" }
        );

        Ok(())
    }
}
