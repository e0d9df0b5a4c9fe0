//! Input contracts for the AI flows
//!
//! Every flow input is a static type that implements [`Validate`]. The same
//! implementation runs at the command boundary and again at orchestrator
//! entry, so there is a single definition of each flow's constraints.

use crate::utils::data_uri::DataUri;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a tutor chat question
pub const CHAT_QUERY_MAX_CHARS: usize = 500;

/// Minimum length of text accepted by the text summarizer
pub const SUMMARY_TEXT_MIN_CHARS: usize = 20;

/// Maximum length of text accepted by the text and document summarizers
pub const SUMMARY_TEXT_MAX_CHARS: usize = 50_000;

/// Highest quiz score (scores are percentages)
pub const QUIZ_SCORE_MAX: u32 = 100;

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Input failed one or more field constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Creates an error with a single violation
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    /// Returns true if any violation concerns the given field
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Runtime check of a flow input against its declared constraints
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Collects violations for one input, field by field
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation when `ok` is false
    pub fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.violations.push(FieldViolation {
                field: field.to_string(),
                message: message.into(),
            });
        }
        self
    }

    /// Value must contain something other than whitespace
    pub fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), "must not be empty")
    }

    /// Value must be non-blank and at most `max` characters
    pub fn bounded_text(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            return self.not_blank(field, value);
        }
        let len = value.chars().count();
        self.check(
            field,
            len <= max,
            format!("must be at most {} characters long (got {})", max, len),
        )
    }

    /// Value must be between `min` and `max` characters, inclusive
    pub fn length_between(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            self.check(
                field,
                false,
                format!("must be at least {} characters long (got {})", min, len),
            )
        } else {
            self.check(
                field,
                len <= max,
                format!("must be at most {} characters long (got {})", max, len),
            )
        }
    }

    /// Value must be an absolute http(s) URL
    pub fn web_url(&mut self, field: &str, value: &str) -> &mut Self {
        match Url::parse(value.trim()) {
            Ok(url) => self.check(
                field,
                matches!(url.scheme(), "http" | "https") && url.has_host(),
                "must be an http or https URL",
            ),
            Err(e) => self.check(field, false, format!("must be a valid URL ({})", e)),
        }
    }

    /// Value must be a well-formed data URI carrying audio
    ///
    /// Returns the parsed URI so callers do not parse the payload twice.
    pub fn audio_data_uri(&mut self, field: &str, value: &str) -> Option<DataUri> {
        match DataUri::parse(value) {
            Ok(uri) if uri.is_audio() => Some(uri),
            Ok(uri) => {
                self.check(
                    field,
                    false,
                    format!("must contain audio data (got MIME type {})", uri.mime_type),
                );
                None
            }
            Err(e) => {
                self.check(field, false, format!("must be a valid data URI ({})", e));
                None
            }
        }
    }

    /// Finishes validation, failing if anything was recorded
    pub fn finish(&mut self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: std::mem::take(&mut self.violations),
            })
        }
    }
}
