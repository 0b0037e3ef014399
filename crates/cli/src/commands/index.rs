//! Index command handler.

use super::{print_json, rag_config};
use clap::Args;
use urgeease_core::{config::AppConfig, AppResult};
use std::path::Path;
use urgeease_knowledge::{IndexSnapshot, Retriever, SnapshotOrigin};

/// Build the index, or confirm the stored one is current
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Rebuild even if the stored index matches the corpus
    #[arg(long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index command (force: {})", self.force);

        let rag = rag_config(config)?;
        let mut retriever = Retriever::from_config(&rag)?;

        let origin = if self.force {
            retriever.rebuild()?
        } else {
            retriever.ensure_ready()?
        };

        let Some(snapshot) = retriever.snapshot() else {
            return Ok(());
        };

        if self.json {
            print_json(&json_report(origin, snapshot, &rag.corpus.index_dir))?;
        } else {
            let verb = match origin {
                SnapshotOrigin::Reused => "Reused stored index",
                SnapshotOrigin::Rebuilt => "Rebuilt index",
            };
            println!("{}: {} chunks", verb, snapshot.len());
            println!("  Corpus: {}", rag.corpus.data_dir.display());
            println!("  Index: {}", rag.corpus.index_dir.display());
            println!("  Fingerprint: {}", snapshot.fingerprint);
        }

        Ok(())
    }
}

fn json_report(
    origin: SnapshotOrigin,
    snapshot: &IndexSnapshot,
    index_dir: &Path,
) -> serde_json::Value {
    serde_json::json!({
        "origin": origin,
        "chunks": snapshot.len(),
        "fingerprint": snapshot.fingerprint,
        "built_at": snapshot.built_at,
        "settings": snapshot.settings,
        "index_dir": index_dir,
    })
}
