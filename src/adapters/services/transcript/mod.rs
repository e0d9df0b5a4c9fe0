//! Transcript service adapters
//!
//! Implementations of the TranscriptFetcherPort trait:
//! - YouTube (timed-text captions)

pub mod youtube;

pub use youtube::YoutubeTranscriptService;
