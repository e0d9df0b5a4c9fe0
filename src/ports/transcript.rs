/// Transcript fetcher port trait
///
/// Defines the interface for retrieving third-party video transcripts.
/// Implementation: YouTube timed text.
use crate::domain::models::TranscriptSegment;
use crate::error::Result;
use async_trait::async_trait;

/// Port trait for transcript services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptFetcherPort: Send + Sync {
    /// Fetch the ordered caption segments of a video
    ///
    /// An empty list means the video has no transcript; failures to reach
    /// the provider are `TranscriptUnavailable`.
    async fn fetch_transcript(&self, video_url: &str) -> Result<Vec<TranscriptSegment>>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}
