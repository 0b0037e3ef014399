//! Ask command handler.

use super::{print_json, rag_config};
use clap::Args;
use urgeease_core::{config::AppConfig, AppResult};
use urgeease_knowledge::RagChain;

/// Answer a message through the full RAG chain
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The message to answer
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let rag = rag_config(config)?;
        let mut chain = RagChain::from_config(&rag)?;
        let response = chain.invoke(&self.question, &[]).await?;

        if self.json {
            return print_json(&response);
        }

        println!("{}", response.answer);
        if !response.crisis {
            println!();
            let sources = response.source_names();
            if sources.is_empty() {
                println!("Sources: (none retrieved)");
            } else {
                println!("Sources: {}", sources.join(", "));
            }
        }

        Ok(())
    }
}
