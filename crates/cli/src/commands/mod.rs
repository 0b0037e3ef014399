//! Command handlers for the UrgeEase CLI.

pub mod ask;
pub mod eval;
pub mod index;
pub mod search;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use eval::EvalCommand;
pub use index::IndexCommand;
pub use search::SearchCommand;
pub use stats::StatsCommand;

use urgeease_core::{config::AppConfig, AppResult};
use urgeease_knowledge::{load_config, RagConfig};

/// Retrieval configuration for the active workspace.
pub(crate) fn rag_config(config: &AppConfig) -> AppResult<RagConfig> {
    Ok(load_config(&config.workspace, &config.config_path())?)
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
