//! Explicit flow registry
//!
//! Maps a flow name to a type-erased entry so the boundary layer can run a
//! flow from a JSON payload. The registry is a plain value built once at
//! startup; nothing registers itself.

use super::FlowOrchestrator;
use crate::domain::models::{
    AudioSummaryInput, AudioSummaryOutput, ChatInput, ChatOutput, DocumentSummaryInput,
    RecommendationInput, RecommendationOutput, SummaryOutput, TextSummaryInput,
    YoutubeSummaryInput, YoutubeSummaryOutput,
};
use crate::domain::schema::{Validate, ValidationError};
use crate::error::{AppError, Result};
use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Every flow the orchestrator can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    Chat,
    Recommend,
    SummarizeText,
    SummarizeDocument,
    SummarizeAudio,
    SummarizeYoutube,
}

impl FlowKind {
    pub fn all() -> [FlowKind; 6] {
        [
            FlowKind::Chat,
            FlowKind::Recommend,
            FlowKind::SummarizeText,
            FlowKind::SummarizeDocument,
            FlowKind::SummarizeAudio,
            FlowKind::SummarizeYoutube,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Chat => "chat",
            FlowKind::Recommend => "recommend",
            FlowKind::SummarizeText => "summarize-text",
            FlowKind::SummarizeDocument => "summarize-document",
            FlowKind::SummarizeAudio => "summarize-audio",
            FlowKind::SummarizeYoutube => "summarize-youtube",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        FlowKind::all()
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::UnknownFlow(s.to_string()))
    }
}

/// A flow input type and how to run it
pub trait FlowDefinition: DeserializeOwned + Validate + Send + Sync + 'static {
    type Output: Serialize + Send;

    const KIND: FlowKind;

    fn execute<'a>(&'a self, flows: &'a FlowOrchestrator) -> BoxFuture<'a, Result<Self::Output>>;
}

impl FlowDefinition for ChatInput {
    type Output = ChatOutput;
    const KIND: FlowKind = FlowKind::Chat;

    fn execute<'a>(&'a self, flows: &'a FlowOrchestrator) -> BoxFuture<'a, Result<ChatOutput>> {
        Box::pin(flows.chat(self))
    }
}

impl FlowDefinition for RecommendationInput {
    type Output = RecommendationOutput;
    const KIND: FlowKind = FlowKind::Recommend;

    fn execute<'a>(
        &'a self,
        flows: &'a FlowOrchestrator,
    ) -> BoxFuture<'a, Result<RecommendationOutput>> {
        Box::pin(flows.recommend(self))
    }
}

impl FlowDefinition for TextSummaryInput {
    type Output = SummaryOutput;
    const KIND: FlowKind = FlowKind::SummarizeText;

    fn execute<'a>(&'a self, flows: &'a FlowOrchestrator) -> BoxFuture<'a, Result<SummaryOutput>> {
        Box::pin(flows.summarize_text(self))
    }
}

impl FlowDefinition for DocumentSummaryInput {
    type Output = SummaryOutput;
    const KIND: FlowKind = FlowKind::SummarizeDocument;

    fn execute<'a>(&'a self, flows: &'a FlowOrchestrator) -> BoxFuture<'a, Result<SummaryOutput>> {
        Box::pin(flows.summarize_document(self))
    }
}

impl FlowDefinition for AudioSummaryInput {
    type Output = AudioSummaryOutput;
    const KIND: FlowKind = FlowKind::SummarizeAudio;

    fn execute<'a>(
        &'a self,
        flows: &'a FlowOrchestrator,
    ) -> BoxFuture<'a, Result<AudioSummaryOutput>> {
        Box::pin(flows.summarize_audio(self))
    }
}

impl FlowDefinition for YoutubeSummaryInput {
    type Output = YoutubeSummaryOutput;
    const KIND: FlowKind = FlowKind::SummarizeYoutube;

    fn execute<'a>(
        &'a self,
        flows: &'a FlowOrchestrator,
    ) -> BoxFuture<'a, Result<YoutubeSummaryOutput>> {
        Box::pin(flows.summarize_youtube(self))
    }
}

pub type PayloadValidator = fn(&Value) -> Result<()>;
pub type PayloadHandler = for<'a> fn(&'a FlowOrchestrator, Value) -> BoxFuture<'a, Result<Value>>;

/// Type-erased flow: JSON in, JSON out
#[derive(Clone, Copy)]
pub struct FlowEntry {
    pub kind: FlowKind,
    pub validate: PayloadValidator,
    pub handler: PayloadHandler,
}

impl FlowEntry {
    pub fn of<F: FlowDefinition>() -> Self {
        Self {
            kind: F::KIND,
            validate: validate_payload::<F>,
            handler: run_payload::<F>,
        }
    }
}

impl fmt::Debug for FlowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowEntry").field("kind", &self.kind).finish()
    }
}

fn decode<F: DeserializeOwned>(payload: &Value) -> Result<F> {
    F::deserialize(payload).map_err(|e| {
        AppError::Validation(ValidationError::single(
            "payload",
            format!("does not match the expected input ({})", e),
        ))
    })
}

fn validate_payload<F: FlowDefinition>(payload: &Value) -> Result<()> {
    decode::<F>(payload)?.validate()?;
    Ok(())
}

fn run_payload<F: FlowDefinition>(flows: &FlowOrchestrator, payload: Value) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move {
        let input: F = decode(&payload)?;
        let output = input.execute(flows).await?;
        Ok(serde_json::to_value(output)?)
    })
}

/// All flows available to the boundary layer
#[derive(Debug, Clone)]
pub struct FlowRegistry {
    entries: HashMap<FlowKind, FlowEntry>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        let entries = [
            FlowEntry::of::<ChatInput>(),
            FlowEntry::of::<RecommendationInput>(),
            FlowEntry::of::<TextSummaryInput>(),
            FlowEntry::of::<DocumentSummaryInput>(),
            FlowEntry::of::<AudioSummaryInput>(),
            FlowEntry::of::<YoutubeSummaryInput>(),
        ]
        .into_iter()
        .map(|entry| (entry.kind, entry))
        .collect();

        Self { entries }
    }

    /// Look up a flow by its wire name
    pub fn get(&self, name: &str) -> Result<&FlowEntry> {
        let kind: FlowKind = name.parse()?;
        self.entries
            .get(&kind)
            .ok_or_else(|| AppError::UnknownFlow(name.to_string()))
    }

    /// Registered flows in a stable order
    pub fn kinds(&self) -> Vec<FlowKind> {
        let mut kinds: Vec<FlowKind> = self.entries.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl Default for FlowRegistry {
    fn default() -> Self {
        Self::new()
    }
}
