/// Model gateway port trait
///
/// Defines the single interface through which the flows reach a hosted
/// generative model. Implementation: Google Gemini.
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Binary media attached to a request (e.g. uploaded audio)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPart {
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// Shape the model is asked to answer in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

/// A rendered prompt addressed to a specific model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model name (e.g., "gemini-2.0-flash")
    pub model: String,
    pub prompt: String,
    pub media: Option<MediaPart>,
    pub response_format: ResponseFormat,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            media: None,
            response_format: ResponseFormat::Text,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Attaches media (builder pattern)
    pub fn with_media(mut self, media: MediaPart) -> Self {
        self.media = Some(media);
        self
    }

    /// Sets the response format (builder pattern)
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    /// Sets sampling settings (builder pattern)
    pub fn with_generation(mut self, temperature: Option<f32>, max_output_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// What a successful (2xx) model call produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelResponse {
    /// Candidate text, trimmed and non-empty
    Text(String),
    /// No usable text: no candidate, safety filtered, or whitespace only
    Empty { reason: Option<String> },
}

impl ModelResponse {
    /// Wraps model text, treating blank text as empty output
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            ModelResponse::Empty { reason: None }
        } else {
            ModelResponse::Text(trimmed.to_string())
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ModelResponse::Text(text) => Some(text),
            ModelResponse::Empty { .. } => None,
        }
    }

    /// Returns the text, or the given fallback sentence for empty output
    pub fn into_text_or(self, fallback: &str) -> String {
        match self {
            ModelResponse::Text(text) => text,
            ModelResponse::Empty { reason } => {
                log::warn!(
                    "Model returned no usable text (reason: {}), using fallback",
                    reason.as_deref().unwrap_or("unspecified")
                );
                fallback.to_string()
            }
        }
    }
}

/// Port trait for hosted model services
#[async_trait]
pub trait ModelGatewayPort: Send + Sync {
    /// Send one request to the model and return its raw output
    ///
    /// Transport and HTTP failures are `GatewayUnavailable`; a 2xx response
    /// without usable text is `Ok(ModelResponse::Empty)`.
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelResponse>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is configured (has API key)
    fn is_configured(&self) -> bool;
}
