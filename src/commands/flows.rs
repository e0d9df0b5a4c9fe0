//! AI flow commands
//!
//! Typed entry points for each flow plus dispatch by flow name.

use super::{CommandError, Commands};
use crate::domain::models::{
    AudioSummaryInput, AudioSummaryOutput, ChatInput, ChatOutput, DocumentSummaryInput,
    RecommendationInput, RecommendationOutput, SummaryOutput, TextSummaryInput,
    YoutubeSummaryInput, YoutubeSummaryOutput,
};
use crate::flows::{FlowDefinition, FlowKind};
use serde_json::Value;

impl Commands {
    /// Ask the tutor chatbot a question
    pub async fn chat(&self, input: ChatInput) -> Result<ChatOutput, CommandError> {
        self.run(input).await
    }

    /// Recommend courses from quiz results and learning history
    pub async fn recommend(
        &self,
        input: RecommendationInput,
    ) -> Result<RecommendationOutput, CommandError> {
        self.run(input).await
    }

    pub async fn summarize_text(
        &self,
        input: TextSummaryInput,
    ) -> Result<SummaryOutput, CommandError> {
        self.run(input).await
    }

    pub async fn summarize_document(
        &self,
        input: DocumentSummaryInput,
    ) -> Result<SummaryOutput, CommandError> {
        self.run(input).await
    }

    pub async fn summarize_audio(
        &self,
        input: AudioSummaryInput,
    ) -> Result<AudioSummaryOutput, CommandError> {
        self.run(input).await
    }

    pub async fn summarize_youtube(
        &self,
        input: YoutubeSummaryInput,
    ) -> Result<YoutubeSummaryOutput, CommandError> {
        self.run(input).await
    }

    /// Validate at the boundary, then run the flow
    pub async fn run<F: FlowDefinition>(&self, input: F) -> Result<F::Output, CommandError> {
        log::info!("Command: {}", F::KIND);
        input.validate()?;

        let output = input.execute(&self.orchestrator).await?;
        log::info!("Command {} completed", F::KIND);
        Ok(output)
    }

    /// Run a flow by its wire name with a JSON payload
    pub async fn dispatch(&self, flow_name: &str, payload: Value) -> Result<Value, CommandError> {
        let entry = self.registry.get(flow_name)?;
        log::info!("Dispatching flow: {}", entry.kind);

        (entry.validate)(&payload)?;
        let output = (entry.handler)(&self.orchestrator, payload).await?;
        log::info!("Flow {} completed", entry.kind);
        Ok(output)
    }

    /// Names of every registered flow
    pub fn available_flows(&self) -> Vec<FlowKind> {
        self.registry.kinds()
    }
}
