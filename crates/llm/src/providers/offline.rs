//! Offline language model stub.
//!
//! Produces a fixed coaching reply that names the sources cited in the
//! prompt, so the whole pipeline can be exercised without a model runtime.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use urgeease_core::AppResult;

/// Marker that opens a source block in grounded prompts.
const SOURCE_MARKER: &str = "[SOURCE:";

/// Deterministic stand-in for a real model.
#[derive(Debug, Default, Clone)]
pub struct OfflineClient;

impl OfflineClient {
    pub fn new() -> Self {
        Self
    }

    /// Unique source names in order of first appearance.
    fn cited_sources(prompt: &str) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for line in prompt.lines() {
            if let Some(rest) = line.strip_prefix(SOURCE_MARKER) {
                let name = rest.trim_end().trim_end_matches(']').trim().to_string();
                if !name.is_empty() && !sources.contains(&name) {
                    sources.push(name);
                }
            }
        }
        sources
    }

    fn reply(prompt: &str) -> String {
        let sources = Self::cited_sources(prompt);
        let sources_str = if sources.is_empty() {
            "none".to_string()
        } else {
            sources.join(", ")
        };

        format!(
            "1) Supportive response\n\
             It makes sense to feel stuck sometimes. If you're dealing with urges, we can try a small step right now.\n\n\
             2) Practical next steps\n\
             - Name the urge (0-10), then pause and breathe slowly for 60 seconds.\n\
             - Delay 10 minutes and do a quick replacement action (walk, water, message a friend).\n\
             - Note the trigger: time, mood, place, or device.\n\n\
             3) Sources used\n\
             {}",
            sources_str
        )
    }
}

#[async_trait::async_trait]
impl LlmClient for OfflineClient {
    fn provider_name(&self) -> &str {
        "offline"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let content = Self::reply(&request.prompt);
        tracing::debug!("Offline client answered a {}-byte prompt", request.prompt.len());

        Ok(LlmResponse {
            usage: LlmUsage::new(
                request.prompt.split_whitespace().count() as u32,
                content.split_whitespace().count() as u32,
            ),
            content,
            model: request.model.clone(),
        })
    }
}
