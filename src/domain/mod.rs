/// Domain layer - flow inputs, outputs, validation and prompts
///
/// These types are transport-agnostic: the same values travel through the
/// typed commands, the registry dispatch and the HTTP surface.
pub mod models;
pub mod prompts;
pub mod schema;

pub use models::{
    AudioSummaryInput, AudioSummaryOutput, ChatInput, ChatOutput, ChatRole, ChatTurn,
    DocumentSummaryInput, QuizResult, RecommendationInput, RecommendationOutput, SummaryLength,
    SummaryOutput, TextSummaryInput, TranscriptSegment, YoutubeSummaryInput, YoutubeSummaryOutput,
};
pub use prompts::PromptTemplates;
pub use schema::{Validate, ValidationError};
