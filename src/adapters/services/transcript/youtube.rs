//! YouTube timed-text transcript adapter
//!
//! Implements the TranscriptFetcherPort against YouTube's timed-text endpoint.
//! API flow:
//! 1. Extract the video id from the URL
//! 2. GET `<base_url>?lang=<lang>&v=<id>`
//! 3. Parse `<transcript><text start=".." dur="..">..</text></transcript>`
//!
//! An empty 200 response means the video has no captions in that language.

use crate::config::TranscriptConfig;
use crate::domain::models::TranscriptSegment;
use crate::error::{AppError, Result};
use crate::ports::transcript::TranscriptFetcherPort;
use crate::utils::youtube::video_id_from_url;
use async_trait::async_trait;
use quick_xml::escape::unescape;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::borrow::Cow;

/// YouTube transcript service implementation
pub struct YoutubeTranscriptService {
    client: Client,
    base_url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(rename = "text", default)]
    entries: Vec<TimedTextEntry>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEntry {
    #[serde(rename = "@start")]
    start: f64,
    #[serde(rename = "@dur", default)]
    dur: f64,
    #[serde(rename = "$text", default)]
    text: String,
}

impl YoutubeTranscriptService {
    pub fn new(config: &TranscriptConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            language: config.language.clone(),
        })
    }

    /// Parse a timed-text XML body into ordered segments
    fn parse_timed_text(body: &str) -> Result<Vec<TranscriptSegment>> {
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let timed_text: TimedText = quick_xml::de::from_str(body).map_err(|e| {
            AppError::TranscriptUnavailable(format!("Failed to parse transcript: {}", e))
        })?;

        Ok(timed_text
            .entries
            .into_iter()
            .map(|entry| TranscriptSegment {
                text: clean_caption(&entry.text),
                start_time: entry.start,
                duration: entry.dur,
            })
            .filter(|segment| !segment.text.is_empty())
            .collect())
    }
}

/// Caption text is escaped a second time inside the XML and may span lines
///
/// A stray `&` that is not an entity leaves the text as it is.
fn clean_caption(raw: &str) -> String {
    let unescaped = unescape(raw).unwrap_or(Cow::Borrowed(raw));
    unescaped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl TranscriptFetcherPort for YoutubeTranscriptService {
    async fn fetch_transcript(&self, video_url: &str) -> Result<Vec<TranscriptSegment>> {
        let url = Url::parse(video_url.trim())
            .map_err(|e| AppError::TranscriptUnavailable(format!("Invalid video URL: {}", e)))?;
        let video_id = video_id_from_url(&url).ok_or_else(|| {
            AppError::TranscriptUnavailable(format!("Not a YouTube video URL: {}", video_url))
        })?;

        log::info!("Fetching YouTube transcript for video {}", video_id);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("lang", self.language.as_str()), ("v", video_id.as_str())])
            .send()
            .await
            .map_err(|e| {
                AppError::TranscriptUnavailable(format!("Transcript request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::TranscriptUnavailable(format!(
                "Transcript request returned {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            AppError::TranscriptUnavailable(format!("Failed to read transcript: {}", e))
        })?;

        let segments = Self::parse_timed_text(&body)?;
        log::info!(
            "Fetched {} transcript segments for video {}",
            segments.len(),
            video_id
        );
        Ok(segments)
    }

    fn provider_name(&self) -> &str {
        "youtube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::services::test_server::CannedServer;
    use axum::http::StatusCode;

    const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    fn service_at(server: &CannedServer) -> YoutubeTranscriptService {
        YoutubeTranscriptService::new(&TranscriptConfig {
            base_url: format!("{}/api/timedtext", server.base_url),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parse_timed_text() {
        let body = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.1">Welcome to the
course</text><text start="2.6" dur="3">today we&amp;#39;ll cover &amp;quot;loops&amp;quot;</text></transcript>"#;

        let segments = YoutubeTranscriptService::parse_timed_text(body).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Welcome to the course");
        assert_eq!(segments[0].start_time, 0.5);
        assert_eq!(segments[0].duration, 2.1);
        assert_eq!(segments[1].text, "today we'll cover \"loops\"");
    }

    #[test]
    fn test_empty_body_means_no_transcript() {
        assert!(YoutubeTranscriptService::parse_timed_text("")
            .unwrap()
            .is_empty());
        assert!(
            YoutubeTranscriptService::parse_timed_text("<transcript></transcript>")
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_garbage_body_is_unavailable() {
        let result = YoutubeTranscriptService::parse_timed_text(
            r#"<transcript><text start="soon" dur="1">hi</text></transcript>"#,
        );
        assert!(matches!(result, Err(AppError::TranscriptUnavailable(_))));
    }

    #[tokio::test]
    async fn test_non_youtube_url_fails_before_request() {
        let service = YoutubeTranscriptService::new(&TranscriptConfig::default()).unwrap();
        let result = service
            .fetch_transcript("https://example.com/watch?v=dQw4w9WgXcQ")
            .await;
        assert!(matches!(result, Err(AppError::TranscriptUnavailable(_))));
    }

    #[test]
    fn test_numeric_entities_are_decoded() {
        let body = r#"<transcript><text start="1" dur="2">it&amp;#8217;s a &amp;#8220;loop&amp;#8221; &amp;#x2014; AT&amp;amp;T</text></transcript>"#;

        let segments = YoutubeTranscriptService::parse_timed_text(body).unwrap();
        assert_eq!(segments[0].text, "it\u{2019}s a \u{201C}loop\u{201D} \u{2014} AT&T");
    }

    #[test]
    fn test_stray_ampersand_is_kept() {
        assert_eq!(clean_caption("fish & chips"), "fish & chips");
    }

    #[tokio::test]
    async fn test_fetch_transcript_from_server() {
        let server = CannedServer::start(
            StatusCode::OK,
            r#"<transcript><text start="0" dur="1.5">Hello</text><text start="1.5" dur="2">class</text></transcript>"#,
        )
        .await;

        let segments = service_at(&server).fetch_transcript(VIDEO_URL).await.unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text, "class");
        assert_eq!(server.queries(), vec!["lang=en&v=dQw4w9WgXcQ".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_response_means_no_segments() {
        let server = CannedServer::start(StatusCode::OK, "").await;
        let segments = service_at(&server).fetch_transcript(VIDEO_URL).await.unwrap();
        assert!(segments.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let server = CannedServer::start(StatusCode::NOT_FOUND, "no such video").await;
        let result = service_at(&server).fetch_transcript(VIDEO_URL).await;

        assert!(matches!(result, Err(AppError::TranscriptUnavailable(_))));
        assert_eq!(server.hits(), 1);
    }
}
