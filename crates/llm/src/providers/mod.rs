//! Concrete language model adapters.

pub mod offline;
pub mod ollama;

pub use offline::OfflineClient;
pub use ollama::OllamaClient;
