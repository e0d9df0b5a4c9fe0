//! Google Gemini model gateway adapter
//!
//! Implements the ModelGatewayPort for Google's Gemini `generateContent` API.
//! Supports inline media (uploaded audio) and JSON response mode.

use crate::config::GatewayConfig;
use crate::error::{AppError, Result};
use crate::ports::llm::{
    GenerationRequest, MediaPart, ModelGatewayPort, ModelResponse, ResponseFormat,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry2::strategy::{jitter, FixedInterval};
use tokio_retry2::{Retry, RetryError};

/// Google Gemini service implementation
pub struct GoogleService {
    client: Client,
    api_key: String,
    base_url: String,
    max_retries: usize,
    retry_backoff: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GoogleService {
    /// Create a new Google Gemini service from the gateway settings
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    /// Full model path, e.g. "gemini-pro" -> "models/gemini-pro"
    fn model_path(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        }
    }

    fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(2);
        if let Some(MediaPart { mime_type, data }) = &request.media {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                }),
            });
        }
        parts.push(Part {
            text: Some(request.prompt.clone()),
            inline_data: None,
        });

        let generation_config = GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
            response_mime_type: match request.response_format {
                ResponseFormat::Json => Some("application/json"),
                ResponseFormat::Text => None,
            },
        };

        let has_settings = generation_config.temperature.is_some()
            || generation_config.max_output_tokens.is_some()
            || generation_config.response_mime_type.is_some();

        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: has_settings.then_some(generation_config),
        }
    }

    /// Collapse a 2xx body into candidate text or an empty result
    fn extract_response(body: GenerateContentResponse) -> ModelResponse {
        let block_reason = body.prompt_feedback.and_then(|f| f.block_reason);

        let Some(candidate) = body.candidates.into_iter().next() else {
            return ModelResponse::Empty {
                reason: block_reason.or_else(|| Some("no candidates".to_string())),
            };
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        match ModelResponse::from_text(text) {
            ModelResponse::Empty { .. } => ModelResponse::Empty {
                reason: candidate.finish_reason.or(block_reason),
            },
            response => response,
        }
    }

    fn is_transient(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// One generateContent call, classified for the retry loop
    async fn attempt(
        &self,
        url: &str,
        body: &GenerateContentRequest,
    ) -> std::result::Result<ModelResponse, RetryError<AppError>> {
        let response = self
            .client
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                // the URL carries the API key
                let e = e.without_url();
                log::warn!("GenerateContent request failed: {}", e);
                RetryError::Transient {
                    err: AppError::GatewayUnavailable(format!(
                        "GenerateContent request failed: {}",
                        e
                    )),
                    retry_after: None,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("GenerateContent returned {}: {}", status, error_text);
            let err = AppError::GatewayUnavailable(format!(
                "GenerateContent failed with status {}: {}",
                status, error_text
            ));
            return Err(if Self::is_transient(status) {
                RetryError::Transient {
                    err,
                    retry_after: None,
                }
            } else {
                RetryError::Permanent(err)
            });
        }

        let content_response: GenerateContentResponse = response.json().await.map_err(|e| {
            RetryError::Permanent(AppError::GatewayUnavailable(format!(
                "Failed to parse content response: {}",
                e.without_url()
            )))
        })?;

        Ok(Self::extract_response(content_response))
    }
}

#[async_trait]
impl ModelGatewayPort for GoogleService {
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelResponse> {
        if !self.is_configured() {
            return Err(AppError::GatewayUnavailable(
                "Gemini API key is not configured".to_string(),
            ));
        }

        let url = format!(
            "{}/{}:generateContent",
            self.base_url,
            Self::model_path(&request.model)
        );
        let body = Self::build_request(request);

        log::info!(
            "Calling Google generateContent with model: {} (media: {})",
            request.model,
            request.media.is_some()
        );

        let strategy = FixedInterval::new(self.retry_backoff)
            .map(jitter)
            .take(self.max_retries);

        let response = Retry::spawn(strategy, || self.attempt(&url, &body)).await?;

        match &response {
            ModelResponse::Text(text) => log::info!(
                "Google completion successful, generated {} characters",
                text.len()
            ),
            ModelResponse::Empty { reason } => log::warn!(
                "Google completion returned no text (reason: {})",
                reason.as_deref().unwrap_or("unspecified")
            ),
        }

        Ok(response)
    }

    fn provider_name(&self) -> &str {
        "google"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::services::test_server::CannedServer;

    const TEXT_BODY: &str =
        r#"{"candidates": [{"content": {"parts": [{"text": "Hello"}]}, "finishReason": "STOP"}]}"#;

    fn service_at(server: &CannedServer, max_retries: usize) -> GoogleService {
        GoogleService::new(&GatewayConfig {
            api_key: "test-key".to_string(),
            base_url: server.base_url.clone(),
            max_retries,
            retry_backoff_ms: 1,
            ..Default::default()
        })
        .unwrap()
    }

    fn hello() -> GenerationRequest {
        GenerationRequest::new("gemini-2.0-flash", "Say hello")
    }

    fn service(api_key: &str) -> GoogleService {
        GoogleService::new(&GatewayConfig {
            api_key: api_key.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_google_service_creation() {
        let service = service("test_api_key");
        assert_eq!(service.provider_name(), "google");
        assert!(service.is_configured());
    }

    #[test]
    fn test_google_service_not_configured() {
        assert!(!service("").is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_service_fails_without_network() {
        let result = service("")
            .generate(&GenerationRequest::new("gemini-2.0-flash", "hi"))
            .await;
        assert!(matches!(result, Err(AppError::GatewayUnavailable(_))));
    }

    #[test]
    fn test_model_path() {
        assert_eq!(GoogleService::model_path("gemini-pro"), "models/gemini-pro");
        assert_eq!(
            GoogleService::model_path("models/gemini-pro"),
            "models/gemini-pro"
        );
    }

    #[test]
    fn test_request_with_media_and_json() {
        let request = GenerationRequest::new("gemini-2.0-flash", "Transcribe")
            .with_media(MediaPart {
                mime_type: "audio/mpeg".to_string(),
                data: "Zm9v".to_string(),
            })
            .with_response_format(ResponseFormat::Json);

        let body = serde_json::to_value(GoogleService::build_request(&request)).unwrap();
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "audio/mpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "Zm9v");
        assert_eq!(parts[1]["text"], "Transcribe");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_plain_request_omits_generation_config() {
        let request = GenerationRequest::new("gemini-2.0-flash", "Hello");
        let body = serde_json::to_value(GoogleService::build_request(&request)).unwrap();
        assert!(body.get("generationConfig").is_none());
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = parse(
            r#"{"candidates": [{"content": {"parts": [{"text": "Hello "}, {"text": "world"}], "role": "model"}, "finishReason": "STOP"}]}"#,
        );
        assert_eq!(
            GoogleService::extract_response(body),
            ModelResponse::Text("Hello world".to_string())
        );
    }

    #[test]
    fn test_extract_blocked_prompt() {
        let body = parse(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        assert_eq!(
            GoogleService::extract_response(body),
            ModelResponse::Empty {
                reason: Some("SAFETY".to_string())
            }
        );
    }

    #[test]
    fn test_extract_filtered_candidate() {
        let body = parse(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#);
        assert_eq!(
            GoogleService::extract_response(body),
            ModelResponse::Empty {
                reason: Some("SAFETY".to_string())
            }
        );
    }

    #[test]
    fn test_transient_statuses() {
        assert!(GoogleService::is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(GoogleService::is_transient(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!GoogleService::is_transient(StatusCode::BAD_REQUEST));
        assert!(!GoogleService::is_transient(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_generate_returns_text() {
        let server = CannedServer::start(StatusCode::OK, TEXT_BODY).await;
        let response = service_at(&server, 1).generate(&hello()).await.unwrap();

        assert_eq!(response, ModelResponse::Text("Hello".to_string()));
        assert_eq!(server.hits(), 1);
        assert_eq!(server.queries(), vec!["key=test-key".to_string()]);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = CannedServer::start(StatusCode::SERVICE_UNAVAILABLE, "overloaded").await;
        let result = service_at(&server, 1).generate(&hello()).await;

        assert!(matches!(result, Err(AppError::GatewayUnavailable(_))));
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_retried_up_to_max_retries() {
        let server = CannedServer::start(StatusCode::TOO_MANY_REQUESTS, "slow down").await;
        let result = service_at(&server, 3).generate(&hello()).await;

        assert!(matches!(result, Err(AppError::GatewayUnavailable(_))));
        assert_eq!(server.hits(), 4);
    }

    #[tokio::test]
    async fn test_client_error_fails_after_one_attempt() {
        let server = CannedServer::start(StatusCode::BAD_REQUEST, "bad request").await;
        let result = service_at(&server, 3).generate(&hello()).await;

        assert!(matches!(result, Err(AppError::GatewayUnavailable(_))));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_malformed_body_fails_after_one_attempt() {
        let server = CannedServer::start(StatusCode::OK, "<html>not json</html>").await;
        let result = service_at(&server, 3).generate(&hello()).await;

        assert!(matches!(result, Err(AppError::GatewayUnavailable(_))));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty() {
        let server = CannedServer::start(StatusCode::OK, r#"{"candidates": []}"#).await;
        let response = service_at(&server, 1).generate(&hello()).await.unwrap();

        assert!(matches!(response, ModelResponse::Empty { .. }));
        assert_eq!(server.hits(), 1);
    }
}
