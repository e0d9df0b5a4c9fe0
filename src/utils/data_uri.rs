//! RFC 2397 data URI parsing
//!
//! Audio uploads arrive as `data:<mime>[;param]*[;base64],<payload>` strings.
//! The gateway needs the MIME type and a base64 payload to attach them to a
//! model request as inline media.

use crate::ports::llm::MediaPart;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Base64 characters checked per step; decodes into a fixed buffer
const BASE64_CHUNK: usize = 4096;

/// Reasons a string is not a usable data URI
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUriError {
    #[error("missing data: scheme")]
    MissingScheme,

    #[error("missing ',' between header and payload")]
    MissingPayloadSeparator,

    #[error("malformed MIME type '{0}'")]
    MalformedMimeType(String),

    #[error("payload is empty")]
    EmptyPayload,

    #[error("payload is not valid base64")]
    InvalidBase64,
}

/// A parsed data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Lowercased MIME type, `text/plain` when the header omits it
    pub mime_type: String,
    pub is_base64: bool,
    /// Payload as it appeared after the comma (base64 or percent-encoded)
    pub payload: String,
}

impl DataUri {
    /// Parses and checks a data URI
    ///
    /// Base64 payloads are checked chunk by chunk without keeping the bytes.
    pub fn parse(input: &str) -> Result<Self, DataUriError> {
        let input = input.trim();
        let rest = match input.get(..5) {
            Some(scheme) if scheme.eq_ignore_ascii_case("data:") => &input[5..],
            _ => return Err(DataUriError::MissingScheme),
        };

        let (header, payload) = rest
            .split_once(',')
            .ok_or(DataUriError::MissingPayloadSeparator)?;

        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        let mime_type = if mime_type.is_empty() {
            "text/plain".to_string()
        } else {
            mime_type
        };

        match mime_type.split_once('/') {
            Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() => {}
            _ => return Err(DataUriError::MalformedMimeType(mime_type)),
        }

        if payload.trim().is_empty() {
            return Err(DataUriError::EmptyPayload);
        }

        if is_base64 && !is_valid_base64(payload.trim()) {
            return Err(DataUriError::InvalidBase64);
        }

        Ok(Self {
            mime_type,
            is_base64,
            payload: payload.trim().to_string(),
        })
    }

    /// Whether the declared MIME type is an audio type
    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }

    /// Converts the payload into inline media for a model request
    ///
    /// Payloads without `;base64` are percent-encoded bytes (RFC 2397).
    pub fn into_media_part(self) -> MediaPart {
        let data = if self.is_base64 {
            self.payload
        } else {
            let bytes: Vec<u8> = percent_decode_str(&self.payload).collect();
            STANDARD.encode(bytes)
        };

        MediaPart {
            mime_type: self.mime_type,
            data,
        }
    }
}

/// Whether `payload` is canonical padded base64
///
/// Chunks are multiples of four characters, so padding can only land in the
/// last one.
fn is_valid_base64(payload: &str) -> bool {
    let mut buf = [0u8; BASE64_CHUNK / 4 * 3];
    payload
        .as_bytes()
        .chunks(BASE64_CHUNK)
        .all(|chunk| STANDARD.decode_slice(chunk, &mut buf).is_ok())
}
