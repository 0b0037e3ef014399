//! Retrieval-augmented answering with a crisis gate in front.

pub mod chain;
pub mod crisis;
pub mod types;

pub use chain::RagChain;
pub use crisis::{CrisisGate, CRISIS_MESSAGE, DEFAULT_CRISIS_KEYWORDS};
pub use types::RagResponse;
