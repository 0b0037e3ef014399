//! Language model adapters for UrgeEase.
//!
//! The retrieval core never talks to a model itself: the RAG chain hands a
//! fully built prompt to an [`LlmClient`] and returns its answer unchanged.
//!
//! # Providers
//! - **offline**: deterministic stub used for tests and demos (default)
//! - **ollama**: local LLM runtime over HTTP
//!
//! # Example
//! ```no_run
//! use urgeease_llm::{LlmClient, LlmRequest, providers::OfflineClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OfflineClient::new();
//! let request = LlmRequest::new("[SOURCE: guide.txt]\nBreathe.", "offline");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OfflineClient, OllamaClient};
pub use types::GenerationConfig;
