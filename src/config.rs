//! Application configuration
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Built-in defaults
//! 2. `edunex.toml` in the working directory, or an explicit `--config` file
//! 3. Environment variables `EDUNEX_<SECTION>__<KEY>` (e.g. `EDUNEX_FLOWS__MODEL_ID`)
//!
//! The Gemini API key may also come from `GEMINI_API_KEY` or `GOOGLE_API_KEY`.

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_NAME: &str = "edunex";
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// HTTP surface settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Largest accepted request body; audio arrives inline as a data URI
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            max_body_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Hosted model connection settings
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure
    pub max_retries: usize,
    pub retry_backoff_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
            max_retries: 1,
            retry_backoff_ms: 500,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Keeps the API key out of logs
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

/// Settings the flow orchestrator is constructed with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowConfig {
    /// Which hosted model every flow calls
    pub model_id: String,
    /// Title reported for YouTube summaries (no metadata is fetched)
    pub default_title: String,
    /// Returned by the chat flow when the model produces no text
    pub fallback_response: String,
    /// Returned by the summary flows when the model produces no text
    pub fallback_summary: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            model_id: "gemini-2.0-flash".to_string(),
            default_title: "YouTube Video".to_string(),
            fallback_response: "I'm sorry, I couldn't come up with an answer to that. Could you try rephrasing your question?".to_string(),
            fallback_summary: "A summary could not be generated for this content.".to_string(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// Transcript provider settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptConfig {
    pub base_url: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com/api/timedtext".to_string(),
            language: "en".to_string(),
            timeout_secs: 30,
        }
    }
}

impl TranscriptConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub flows: FlowConfig,
    pub transcripts: TranscriptConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// An explicit `path` must exist; the default `edunex.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("EDUNEX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        if config.gateway.api_key.is_empty() {
            if let Some(key) = API_KEY_VARS
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            {
                config.gateway.api_key = key;
            }
        }

        config.check()?;
        Ok(config)
    }

    /// Rejects settings no flow can run with
    pub fn check(&self) -> Result<()> {
        if self.flows.model_id.trim().is_empty() {
            return Err(AppError::Config("flows.model_id must not be empty".to_string()));
        }
        if self.gateway.base_url.trim().is_empty() {
            return Err(AppError::Config("gateway.base_url must not be empty".to_string()));
        }
        if self.server.max_body_bytes == 0 {
            return Err(AppError::Config(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
