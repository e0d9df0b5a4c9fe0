//! User-facing command errors
//!
//! Internal errors carry provider bodies, URLs and parser details. None of
//! that leaves the process: each `AppError` is logged here and replaced by a
//! short message the web application can show to a student.

use crate::domain::schema::{FieldViolation, ValidationError};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The AI service is temporarily unavailable. Please try again in a moment.";
pub const MEDIA_UNPROCESSABLE_MESSAGE: &str =
    "The audio could not be processed. Please check the recording and try again.";
pub const TRANSCRIPT_UNAVAILABLE_MESSAGE: &str =
    "A transcript could not be retrieved for this video. It may not have captions.";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str =
    "The request is too large. Please upload a shorter recording or document.";
pub const INTERNAL_MESSAGE: &str = "Something went wrong on our side. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandErrorKind {
    InvalidInput,
    ServiceUnavailable,
    MediaUnprocessable,
    TranscriptUnavailable,
    UnknownFlow,
    PayloadTooLarge,
    Internal,
}

/// Error returned across the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandError {
    pub kind: CommandErrorKind,
    pub message: String,
    /// Per-field messages, only for invalid input
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldViolation>,
}

impl CommandError {
    fn new(kind: CommandErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Request body exceeded the transport's size limit
    pub fn payload_too_large() -> Self {
        Self::new(CommandErrorKind::PayloadTooLarge, PAYLOAD_TOO_LARGE_MESSAGE)
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<ValidationError> for CommandError {
    fn from(error: ValidationError) -> Self {
        log::info!("Rejected invalid input: {}", error);
        Self {
            kind: CommandErrorKind::InvalidInput,
            message: "Please correct the highlighted fields and try again.".to_string(),
            fields: error.violations,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation(e) => e.into(),
            AppError::GatewayUnavailable(_) | AppError::InvalidOutput(_) => {
                log::warn!("Model service failure: {}", error);
                Self::new(
                    CommandErrorKind::ServiceUnavailable,
                    SERVICE_UNAVAILABLE_MESSAGE,
                )
            }
            AppError::TranscriptionFailed(_) => {
                log::warn!("{}", error);
                Self::new(
                    CommandErrorKind::MediaUnprocessable,
                    MEDIA_UNPROCESSABLE_MESSAGE,
                )
            }
            AppError::TranscriptUnavailable(_) => {
                log::warn!("{}", error);
                Self::new(
                    CommandErrorKind::TranscriptUnavailable,
                    TRANSCRIPT_UNAVAILABLE_MESSAGE,
                )
            }
            AppError::UnknownFlow(name) => {
                log::info!("Request for unknown flow '{}'", name);
                Self::new(
                    CommandErrorKind::UnknownFlow,
                    format!("Unknown AI feature: {}", name),
                )
            }
            other => {
                log::error!("Internal error while running a flow: {}", other);
                Self::new(CommandErrorKind::Internal, INTERNAL_MESSAGE)
            }
        }
    }
}
