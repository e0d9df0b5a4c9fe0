/// Domain models for the EduNex AI flows
///
/// Flow inputs and outputs are request-scoped and never persisted. Field names
/// are camelCase on the wire to match the storefront's JSON.
use crate::domain::schema::{
    Validate, ValidationError, Validator, CHAT_QUERY_MAX_CHARS, QUIZ_SCORE_MAX,
    SUMMARY_TEXT_MAX_CHARS, SUMMARY_TEXT_MIN_CHARS,
};
use crate::utils::data_uri::DataUri;
use serde::{Deserialize, Serialize};

/// Qualitative target length for every summarizer flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SummaryLength {
    #[serde(rename = "Short (approx. 50 words)")]
    Short,
    #[default]
    #[serde(rename = "Medium (approx. 100 words)")]
    Medium,
    #[serde(rename = "Long (approx. 200 words)")]
    Long,
}

impl SummaryLength {
    /// Human-readable phrase embedded in prompts (also the wire value)
    pub fn label(&self) -> &'static str {
        match self {
            SummaryLength::Short => "Short (approx. 50 words)",
            SummaryLength::Medium => "Medium (approx. 100 words)",
            SummaryLength::Long => "Long (approx. 200 words)",
        }
    }

    pub fn approx_words(&self) -> u32 {
        match self {
            SummaryLength::Short => 50,
            SummaryLength::Medium => 100,
            SummaryLength::Long => 200,
        }
    }

    pub fn all() -> [SummaryLength; 3] {
        [SummaryLength::Short, SummaryLength::Medium, SummaryLength::Long]
    }
}

impl std::fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Who said a line of a caller-threaded chat history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Student,
    Tutor,
}

impl ChatRole {
    /// Speaker name used in the chat prompt
    pub fn speaker(&self) -> &'static str {
        match self {
            ChatRole::Student => "Student",
            ChatRole::Tutor => "Tutor",
        }
    }
}

/// One earlier turn of a tutoring conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Tutor chatbot question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatInput {
    pub query: String,
    /// Earlier turns, oldest first; the flows keep no memory of their own
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl ChatInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            history: Vec::new(),
        }
    }
}

impl Validate for ChatInput {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut validator = Validator::new();
        validator.bounded_text("query", &self.query, CHAT_QUERY_MAX_CHARS);
        for (i, turn) in self.history.iter().enumerate() {
            validator.not_blank(&format!("history[{}].content", i), &turn.content);
        }
        validator.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutput {
    pub response: String,
}

/// Score a student obtained on one quiz
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_name: String,
    /// Percentage, 0 to 100
    pub score: u32,
}

/// Course recommendation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationInput {
    pub student_id: String,
    #[serde(default)]
    pub quiz_results: Vec<QuizResult>,
    /// Titles of courses the student has taken, oldest first
    #[serde(default)]
    pub learning_history: Vec<String>,
}

impl Validate for RecommendationInput {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut validator = Validator::new();
        validator.not_blank("studentId", &self.student_id);
        for (i, result) in self.quiz_results.iter().enumerate() {
            validator
                .not_blank(&format!("quizResults[{}].quizName", i), &result.quiz_name)
                .check(
                    &format!("quizResults[{}].score", i),
                    result.score <= QUIZ_SCORE_MAX,
                    format!("must be between 0 and {}", QUIZ_SCORE_MAX),
                );
        }
        for (i, entry) in self.learning_history.iter().enumerate() {
            validator.not_blank(&format!("learningHistory[{}]", i), entry);
        }
        validator.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutput {
    pub recommended_courses: Vec<String>,
    pub recommended_topics: Vec<String>,
}

/// Free text to summarize
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TextSummaryInput {
    pub text_to_summarize: String,
    pub summary_length: SummaryLength,
}

impl Validate for TextSummaryInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new()
            .length_between(
                "textToSummarize",
                &self.text_to_summarize,
                SUMMARY_TEXT_MIN_CHARS,
                SUMMARY_TEXT_MAX_CHARS,
            )
            .finish()
    }
}

/// Text the caller extracted from an uploaded document (PDF)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummaryInput {
    pub extracted_text: String,
    pub summary_length: SummaryLength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Validate for DocumentSummaryInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new()
            .bounded_text("extractedText", &self.extracted_text, SUMMARY_TEXT_MAX_CHARS)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutput {
    pub summary: String,
}

/// Recorded audio to transcribe and summarize
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AudioSummaryInput {
    pub audio_data_uri: String,
    pub summary_length: SummaryLength,
}

impl AudioSummaryInput {
    /// Validates and parses the upload in one pass
    pub fn audio(&self) -> Result<DataUri, ValidationError> {
        let mut validator = Validator::new();
        let audio = validator.audio_data_uri("audioDataUri", &self.audio_data_uri);
        validator.finish()?;
        audio.ok_or_else(|| ValidationError::single("audioDataUri", "must contain audio data"))
    }
}

impl Validate for AudioSummaryInput {
    fn validate(&self) -> Result<(), ValidationError> {
        self.audio().map(|_| ())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AudioSummaryOutput {
    pub transcription: String,
    pub summary: String,
}

/// YouTube video to summarize from its transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeSummaryInput {
    pub video_url: String,
    pub summary_length: SummaryLength,
}

impl Validate for YoutubeSummaryInput {
    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new().web_url("videoUrl", &self.video_url).finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeSummaryOutput {
    pub summary: String,
    pub title: String,
}

/// One timed caption line of a video transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub text: String,
    /// Seconds from the start of the video
    pub start_time: f64,
    /// Seconds
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            duration,
        }
    }
}

/// Joins segment texts with single spaces, keeping their order
pub fn join_transcript(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_length_wire_values() {
        assert_eq!(
            serde_json::to_string(&SummaryLength::Short).unwrap(),
            "\"Short (approx. 50 words)\""
        );
        let parsed: SummaryLength = serde_json::from_str("\"Long (approx. 200 words)\"").unwrap();
        assert_eq!(parsed, SummaryLength::Long);
        assert!(serde_json::from_str::<SummaryLength>("\"Huge\"").is_err());

        for length in SummaryLength::all() {
            assert_eq!(length.to_string(), length.label());
            assert!(length.label().contains(&length.approx_words().to_string()));
        }
    }

    #[test]
    fn test_text_summary_input_camel_case() {
        let input: TextSummaryInput = serde_json::from_str(
            r#"{"textToSummarize": "some text", "summaryLength": "Medium (approx. 100 words)"}"#,
        )
        .unwrap();
        assert_eq!(input.text_to_summarize, "some text");
        assert_eq!(input.summary_length, SummaryLength::Medium);
    }

    #[test]
    fn test_text_summary_bounds() {
        let mut input = TextSummaryInput {
            text_to_summarize: "A".repeat(20),
            summary_length: SummaryLength::Short,
        };
        assert!(input.validate().is_ok());

        input.text_to_summarize = "A".repeat(19);
        let err = input.validate().unwrap_err();
        assert!(err.has_field("textToSummarize"));

        input.text_to_summarize = "A".repeat(50_000);
        assert!(input.validate().is_ok());

        input.text_to_summarize = "A".repeat(50_001);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_chat_input_validation() {
        assert!(ChatInput::new("What is a monad?").validate().is_ok());
        assert!(ChatInput::new("").validate().is_err());
        assert!(ChatInput::new("x".repeat(501)).validate().is_err());

        let input = ChatInput {
            query: "And then?".to_string(),
            history: vec![ChatTurn {
                role: ChatRole::Student,
                content: " ".to_string(),
            }],
        };
        let err = input.validate().unwrap_err();
        assert!(err.has_field("history[0].content"));
    }

    #[test]
    fn test_chat_history_defaults_to_empty() {
        let input: ChatInput = serde_json::from_str(r#"{"query": "hi"}"#).unwrap();
        assert!(input.history.is_empty());
    }

    #[test]
    fn test_recommendation_validation() {
        let input = RecommendationInput {
            student_id: "student-1".to_string(),
            quiz_results: vec![
                QuizResult {
                    quiz_name: "Algebra".to_string(),
                    score: 40,
                },
                QuizResult {
                    quiz_name: "".to_string(),
                    score: 140,
                },
            ],
            learning_history: vec!["Intro to Python".to_string()],
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.has_field("quizResults[1].quizName"));
        assert!(err.has_field("quizResults[1].score"));
    }

    #[test]
    fn test_document_validation() {
        let input = DocumentSummaryInput {
            extracted_text: "\n\n".to_string(),
            summary_length: SummaryLength::Short,
            file_name: Some("notes.pdf".to_string()),
        };
        assert!(input.validate().unwrap_err().has_field("extractedText"));
    }

    #[test]
    fn test_audio_input_parses_upload() {
        let input = AudioSummaryInput {
            audio_data_uri: "data:audio/wav,%00%01".to_string(),
            summary_length: SummaryLength::Short,
        };
        let audio = input.audio().unwrap();
        assert_eq!(audio.mime_type, "audio/wav");
        assert!(!audio.is_base64);

        let input = AudioSummaryInput {
            audio_data_uri: "data:image/png;base64,Zm9v".to_string(),
            summary_length: SummaryLength::Short,
        };
        assert!(input.validate().unwrap_err().has_field("audioDataUri"));
    }

    #[test]
    fn test_join_transcript_preserves_order() {
        let segments = vec![
            TranscriptSegment::new("hello", 0.0, 1.0),
            TranscriptSegment::new("there", 1.0, 1.0),
            TranscriptSegment::new("students", 2.0, 1.5),
        ];
        assert_eq!(join_transcript(&segments), "hello there students");
        assert_eq!(join_transcript(&[]), "");
    }
}
