//! UrgeEase CLI
//!
//! Main entry point for the urgeease command-line tool.
//! Builds and queries the local coping-guide index and runs the RAG chain.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, EvalCommand, IndexCommand, SearchCommand, StatsCommand};
use urgeease_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// UrgeEase CLI - grounded coping support over a local corpus
#[derive(Parser, Debug)]
#[command(name = "urgeease")]
#[command(about = "Grounded coping support over a local corpus", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "URGEEASE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file (default: .urgeease/config.yaml)
    #[arg(short, long, global = true, env = "URGEEASE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the index, or confirm the stored one is current
    Index(IndexCommand),

    /// Retrieve the chunks most relevant to a query
    Search(SearchCommand),

    /// Answer a message through the full RAG chain
    Ask(AskCommand),

    /// Show corpus statistics
    Stats(StatsCommand),

    /// Run the crisis and retrieval sanity checks
    Eval(EvalCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("UrgeEase CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Config file: {:?}", config.config_path());

    config.ensure_state_dir()?;

    let command_name = match &cli.command {
        Commands::Index(_) => "index",
        Commands::Search(_) => "search",
        Commands::Ask(_) => "ask",
        Commands::Stats(_) => "stats",
        Commands::Eval(_) => "eval",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Index(cmd) => cmd.execute(&config),
        Commands::Search(cmd) => cmd.execute(&config),
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config),
        Commands::Eval(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
