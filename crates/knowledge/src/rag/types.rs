//! RAG response types.

use crate::types::ScoredChunk;
use serde::{Deserialize, Serialize};

/// Outcome of one turn of the RAG chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagResponse {
    /// Generated answer, or the crisis message
    pub answer: String,

    /// Retrieved chunks the answer was grounded on; empty on crisis
    pub sources: Vec<ScoredChunk>,

    /// Whether the crisis gate fired
    pub crisis: bool,

    /// Whether retrieval used maximal marginal relevance
    pub used_mmr: bool,
}

impl RagResponse {
    /// Response for a message that tripped the crisis gate.
    pub fn crisis(message: impl Into<String>) -> Self {
        Self {
            answer: message.into(),
            sources: Vec::new(),
            crisis: true,
            used_mmr: false,
        }
    }

    /// Distinct source filenames in order of first appearance.
    pub fn source_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for hit in &self.sources {
            if !names.contains(&hit.chunk.source) {
                names.push(hit.chunk.source.clone());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_response_has_no_sources() {
        let response = RagResponse::crisis("call 988");
        assert!(response.crisis);
        assert!(response.sources.is_empty());
        assert!(response.source_names().is_empty());
    }

    #[test]
    fn test_serializes_flags() {
        let json = serde_json::to_value(RagResponse::crisis("x")).unwrap();
        assert_eq!(json["crisis"], true);
        assert_eq!(json["used_mmr"], false);
    }
}
