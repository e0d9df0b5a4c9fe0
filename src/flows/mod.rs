//! AI flow orchestration
//!
//! Each flow is a strict linear pipeline:
//! validate -> [upstream fetch] -> render -> invoke gateway -> validate output.
//! No stage starts before the previous one has produced its result, and no
//! state survives between invocations.

mod chat;
mod recommend;
pub mod registry;
mod summarize;

pub use registry::{FlowDefinition, FlowEntry, FlowKind, FlowRegistry};

use crate::config::FlowConfig;
use crate::domain::prompts::{PromptTemplates, RenderedPrompt};
use crate::error::Result;
use crate::ports::llm::{GenerationRequest, ModelGatewayPort, ModelResponse};
use crate::ports::transcript::TranscriptFetcherPort;
use std::sync::Arc;

/// Runs the AI flows against a model gateway and a transcript fetcher
pub struct FlowOrchestrator {
    gateway: Arc<dyn ModelGatewayPort>,
    transcripts: Arc<dyn TranscriptFetcherPort>,
    prompts: PromptTemplates,
    config: FlowConfig,
}

impl FlowOrchestrator {
    pub fn new(
        gateway: Arc<dyn ModelGatewayPort>,
        transcripts: Arc<dyn TranscriptFetcherPort>,
        config: FlowConfig,
    ) -> Result<Self> {
        Ok(Self {
            gateway,
            transcripts,
            prompts: PromptTemplates::new()?,
            config,
        })
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Request for the configured model carrying the given prompt
    fn request(&self, prompt: RenderedPrompt) -> GenerationRequest {
        GenerationRequest::new(&self.config.model_id, prompt.into_string())
            .with_generation(self.config.temperature, self.config.max_output_tokens)
    }

    async fn invoke(&self, request: GenerationRequest) -> Result<ModelResponse> {
        log::debug!(
            "Invoking {} gateway, prompt is {} characters",
            self.gateway.provider_name(),
            request.prompt.chars().count()
        );
        self.gateway.generate(&request).await
    }
}
