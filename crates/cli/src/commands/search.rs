//! Search command handler.

use super::{print_json, rag_config};
use clap::Args;
use urgeease_core::{config::AppConfig, AppResult};
use urgeease_knowledge::Retriever;

/// Maximum characters of chunk text shown per hit.
const PREVIEW_CHARS: usize = 160;

/// Retrieve the chunks most relevant to a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Number of chunks to retrieve (default from config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Plain top-k instead of maximal marginal relevance
    #[arg(long)]
    pub no_mmr: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let rag = rag_config(config)?;
        let k = self.top_k.unwrap_or(rag.retrieval.k);
        let use_mmr = rag.retrieval.use_mmr && !self.no_mmr;

        let mut retriever = Retriever::from_config(&rag)?;
        let retrieval = retriever.search_with(&self.query, k, use_mmr)?;

        if self.json {
            return print_json(&retrieval);
        }

        if retrieval.is_empty() {
            println!("No chunks found (is the corpus empty?)");
            return Ok(());
        }

        println!(
            "{} results ({})",
            retrieval.chunks.len(),
            if retrieval.used_mmr { "mmr" } else { "top-k" }
        );
        for (rank, hit) in retrieval.chunks.iter().enumerate() {
            println!(
                "\n{}. {} #{} (score {:.3})",
                rank + 1,
                hit.chunk.source,
                hit.chunk.sequence_index,
                hit.score
            );
            println!("   {}", preview(&hit.chunk.text));
        }

        Ok(())
    }
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}
