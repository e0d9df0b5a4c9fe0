//! Prompt templates for the AI flows
//!
//! Templates are fixed when [`PromptTemplates`] is built. Caller input only
//! ever fills placeholders; a value containing template syntax is rendered
//! literally and cannot change the structure of a prompt.

use crate::domain::models::{
    ChatInput, DocumentSummaryInput, RecommendationInput, SummaryLength,
};
use crate::error::Result;
use minijinja::{context, Environment, UndefinedBehavior, Value};

const CHAT: &str = "chat";
const RECOMMENDATION: &str = "recommendation";
const TEXT_SUMMARY: &str = "text_summary";
const DOCUMENT_SUMMARY: &str = "document_summary";
const VIDEO_SUMMARY: &str = "video_summary";

/// Fixed instruction sent alongside uploaded audio
pub const TRANSCRIPTION_INSTRUCTION: &str = "Transcribe the spoken content of this audio recording verbatim. \
Return only the transcript text, without commentary, timestamps or speaker labels. \
If the recording contains no intelligible speech, return an empty response.";

const CHAT_TEMPLATE: &str = r#"You are EduNex's AI tutor. You help students understand course material, answer study questions and suggest how to keep learning. Give clear, accurate and encouraging answers. If a question is unrelated to learning, politely steer the conversation back to the student's studies.
{% if history %}

Conversation so far:
{% for turn in history %}
{{ turn.speaker }}: {{ turn.content }}
{% endfor %}
{% endif %}

Student: {{ query }}
Tutor:"#;

const RECOMMENDATION_TEMPLATE: &str = r#"You are an academic advisor for the EduNex learning platform. Based on a student's quiz performance and learning history, recommend courses and topics that strengthen their weak areas and build on what they already know.

Student ID: {{ student_id }}

Quiz results:
{% for result in quiz_results %}
- {{ result.quizName }}: {{ result.score }}%
{% else %}
- No quiz results recorded yet.
{% endfor %}

Learning history:
{% for entry in learning_history %}
- {{ entry }}
{% else %}
- No courses taken yet.
{% endfor %}

Respond with a JSON object containing exactly two fields: "recommendedCourses", an array of course titles, and "recommendedTopics", an array of topic names. Do not include any other text."#;

const TEXT_SUMMARY_TEMPLATE: &str = r#"You are an expert at summarizing educational material for students.

Summarize the following text. Target length: {{ length }}. Focus on the key concepts, definitions and takeaways a student needs to review this material.

Text:
{{ text }}

Summary:"#;

const DOCUMENT_SUMMARY_TEMPLATE: &str = r#"You are an expert at summarizing educational documents for students.

Summarize the following document{% if file_name %} ("{{ file_name }}"){% endif %}. Target length: {{ length }}. Cover its main sections, key concepts and conclusions.

Document text:
{{ text }}

Summary:"#;

const VIDEO_SUMMARY_TEMPLATE: &str = r#"You are an expert at summarizing educational videos for students.

Summarize the following YouTube video transcript. Target length: {{ length }}. Focus on the main ideas and takeaways; ignore filler, greetings and sponsor messages.

Transcript:
{{ transcript }}

Summary:"#;

/// A prompt produced by a single render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt(String);

impl RenderedPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered prompt templates for every flow
pub struct PromptTemplates {
    env: Environment<'static>,
}

impl PromptTemplates {
    /// Builds the template environment
    ///
    /// Fails only if a built-in template does not parse.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_template(CHAT, CHAT_TEMPLATE)?;
        env.add_template(RECOMMENDATION, RECOMMENDATION_TEMPLATE)?;
        env.add_template(TEXT_SUMMARY, TEXT_SUMMARY_TEMPLATE)?;
        env.add_template(DOCUMENT_SUMMARY, DOCUMENT_SUMMARY_TEMPLATE)?;
        env.add_template(VIDEO_SUMMARY, VIDEO_SUMMARY_TEMPLATE)?;

        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: Value) -> Result<RenderedPrompt> {
        let rendered = self.env.get_template(name)?.render(ctx)?;
        Ok(RenderedPrompt(rendered))
    }

    pub fn chat(&self, input: &ChatInput) -> Result<RenderedPrompt> {
        let history: Vec<Value> = input
            .history
            .iter()
            .map(|turn| context! { speaker => turn.role.speaker(), content => turn.content })
            .collect();

        self.render(CHAT, context! { query => input.query, history => history })
    }

    pub fn recommendation(&self, input: &RecommendationInput) -> Result<RenderedPrompt> {
        self.render(
            RECOMMENDATION,
            context! {
                student_id => input.student_id,
                quiz_results => input.quiz_results,
                learning_history => input.learning_history,
            },
        )
    }

    pub fn text_summary(&self, text: &str, length: SummaryLength) -> Result<RenderedPrompt> {
        self.render(
            TEXT_SUMMARY,
            context! { text => text, length => length.label() },
        )
    }

    pub fn document_summary(&self, input: &DocumentSummaryInput) -> Result<RenderedPrompt> {
        self.render(
            DOCUMENT_SUMMARY,
            context! {
                text => input.extracted_text,
                length => input.summary_length.label(),
                file_name => input.file_name,
            },
        )
    }

    pub fn video_summary(&self, transcript: &str, length: SummaryLength) -> Result<RenderedPrompt> {
        self.render(
            VIDEO_SUMMARY,
            context! { transcript => transcript, length => length.label() },
        )
    }
}
