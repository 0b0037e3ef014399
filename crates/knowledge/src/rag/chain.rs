//! RAG chain orchestration.
//!
//! Crisis gate, then retrieval, prompt assembly and a single model call.

use crate::config::RagConfig;
use crate::rag::crisis::{CrisisGate, CRISIS_MESSAGE};
use crate::rag::types::RagResponse;
use crate::retriever::Retriever;
use crate::types::ScoredChunk;
use std::sync::Arc;
use urgeease_core::AppResult;
use urgeease_llm::factory::client_from_config;
use urgeease_llm::{GenerationConfig, LlmClient, LlmRequest};
use urgeease_prompt::{build_prompt, load_template, ChatTurn, ContextBlock, PromptTemplate};

/// Answers user messages grounded on the retrieved corpus.
pub struct RagChain {
    retriever: Retriever,
    client: Arc<dyn LlmClient>,
    gate: CrisisGate,
    template: PromptTemplate,
    generation: GenerationConfig,
}

impl RagChain {
    pub fn new(
        retriever: Retriever,
        client: Arc<dyn LlmClient>,
        gate: CrisisGate,
        template: PromptTemplate,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            retriever,
            client,
            gate,
            template,
            generation,
        }
    }

    /// Wire every collaborator from configuration.
    pub fn from_config(config: &RagConfig) -> AppResult<Self> {
        let retriever = Retriever::from_config(config)?;
        let client = client_from_config(&config.generation)?;
        let template = match &config.prompt_template {
            Some(path) => load_template(path)?,
            None => PromptTemplate::default(),
        };

        Ok(Self::new(
            retriever,
            client,
            CrisisGate::from_config(&config.safety),
            template,
            config.generation.clone(),
        ))
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn retriever_mut(&mut self) -> &mut Retriever {
        &mut self.retriever
    }

    /// Answer one message.
    ///
    /// A crisis message returns the fixed crisis reply without touching the
    /// retriever or the model.
    pub async fn invoke(&mut self, question: &str, history: &[ChatTurn]) -> AppResult<RagResponse> {
        if self.gate.is_crisis(question) {
            tracing::warn!("Crisis gate triggered; skipping retrieval");
            return Ok(RagResponse::crisis(CRISIS_MESSAGE));
        }

        let retrieval = self.retriever.search(question)?;
        let context = context_blocks(&retrieval.chunks);
        let prompt = build_prompt(&self.template, history, &context, question)?;

        tracing::info!(
            "Asking '{}' with {} context blocks",
            self.client.provider_name(),
            context.len()
        );

        let request = LlmRequest::new(prompt.text, self.generation.model.clone())
            .with_temperature(self.generation.temperature);
        let response = self.client.complete(&request).await?;

        Ok(RagResponse {
            answer: response.content,
            sources: retrieval.chunks,
            crisis: false,
            used_mmr: retrieval.used_mmr,
        })
    }
}

fn context_blocks(chunks: &[ScoredChunk]) -> Vec<ContextBlock> {
    chunks
        .iter()
        .map(|hit| ContextBlock {
            source: hit.chunk.source.clone(),
            text: hit.chunk.text.clone(),
        })
        .collect()
}
