//! Logging infrastructure for UrgeEase.
//!
//! All logs go to stderr so stdout stays clean for search results, answers
//! and `--json` output.

use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{AppError, AppResult};

/// Crates whose events follow a bare level such as `--log-level debug`.
const WORKSPACE_TARGETS: &[&str] = &[
    "urgeease",
    "urgeease_core",
    "urgeease_llm",
    "urgeease_prompt",
    "urgeease_knowledge",
];

/// Level applied to everything else (reqwest, hyper, handlebars).
const DEPENDENCY_LEVEL: &str = "warn";

/// Initialize the tracing subscriber with stderr output.
///
/// `log_level` (or `RUST_LOG`, default `info`) may be a bare level, which is
/// applied to the workspace crates only, or a full filter directive, which is
/// used as given.
///
/// # Example
/// ```no_run
/// use urgeease_core::logging::init_logging;
///
/// init_logging(Some("debug"), false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = build_filter(log_level.unwrap_or(&default_level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Turn a level or directive string into a filter.
fn build_filter(spec: &str) -> AppResult<EnvFilter> {
    let directives = match spec.trim().parse::<LevelFilter>() {
        Ok(level) if level > LevelFilter::WARN => {
            let mut parts = vec![DEPENDENCY_LEVEL.to_string()];
            parts.extend(
                WORKSPACE_TARGETS
                    .iter()
                    .map(|target| format!("{}={}", target, level)),
            );
            parts.join(",")
        }
        _ => spec.to_string(),
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", spec, e)))
}

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}
