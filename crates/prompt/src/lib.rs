//! Prompt assembly for UrgeEase.
//!
//! This crate turns retrieved context and chat history into the grounding
//! prompt handed to the language model:
//! - YAML-based template definitions (optional override)
//! - Handlebars template rendering
//! - Chat history and source-tagged context formatting

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, format_context, format_history};
pub use loader::{load_template, DEFAULT_TEMPLATE_ID};
pub use types::{BuiltPrompt, BuiltPromptMetadata, ChatTurn, ContextBlock, PromptTemplate, Role};
