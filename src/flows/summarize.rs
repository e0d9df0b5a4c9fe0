//! Summarizer flows: text, document, audio and YouTube

use super::FlowOrchestrator;
use crate::domain::models::{
    join_transcript, AudioSummaryInput, AudioSummaryOutput, DocumentSummaryInput,
    SummaryOutput, TextSummaryInput, YoutubeSummaryInput, YoutubeSummaryOutput,
};
use crate::domain::prompts::TRANSCRIPTION_INSTRUCTION;
use crate::domain::schema::Validate;
use crate::error::{AppError, Result};
use crate::ports::llm::GenerationRequest;

impl FlowOrchestrator {
    /// Summarize free text
    pub async fn summarize_text(&self, input: &TextSummaryInput) -> Result<SummaryOutput> {
        input.validate()?;
        log::info!(
            "Running text summary flow ({} characters, {:?})",
            input.text_to_summarize.chars().count(),
            input.summary_length
        );

        let prompt = self
            .prompts
            .text_summary(&input.text_to_summarize, input.summary_length)?;
        let summary = self
            .invoke(self.request(prompt))
            .await?
            .into_text_or(&self.config.fallback_summary);

        Ok(SummaryOutput { summary })
    }

    /// Summarize text extracted from an uploaded document
    pub async fn summarize_document(&self, input: &DocumentSummaryInput) -> Result<SummaryOutput> {
        input.validate()?;
        log::info!(
            "Running document summary flow ({} characters, {:?})",
            input.extracted_text.chars().count(),
            input.summary_length
        );

        let prompt = self.prompts.document_summary(input)?;
        let summary = self
            .invoke(self.request(prompt))
            .await?
            .into_text_or(&self.config.fallback_summary);

        Ok(SummaryOutput { summary })
    }

    /// Transcribe uploaded audio, then summarize the transcript
    ///
    /// The summary stage is the text summary flow run on the exact transcript.
    pub async fn summarize_audio(&self, input: &AudioSummaryInput) -> Result<AudioSummaryOutput> {
        let audio = input.audio()?;
        log::info!("Running audio summary flow ({})", audio.mime_type);

        let request = GenerationRequest::new(&self.config.model_id, TRANSCRIPTION_INSTRUCTION)
            .with_media(audio.into_media_part())
            .with_generation(self.config.temperature, self.config.max_output_tokens);

        let transcription = self
            .invoke(request)
            .await?
            .text()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::TranscriptionFailed("model returned an empty transcript".to_string())
            })?;
        log::debug!(
            "Transcribed {} characters of audio",
            transcription.chars().count()
        );

        let summary_input = TextSummaryInput {
            text_to_summarize: transcription,
            summary_length: input.summary_length,
        };
        let summary = match self.summarize_text(&summary_input).await {
            Ok(output) => output.summary,
            // the caller never supplied this text, so a rejected transcript is
            // a transcription problem rather than invalid input
            Err(AppError::Validation(e)) => {
                return Err(AppError::TranscriptionFailed(format!(
                    "transcript cannot be summarized: {}",
                    e
                )))
            }
            Err(e) => return Err(e),
        };

        Ok(AudioSummaryOutput {
            transcription: summary_input.text_to_summarize,
            summary,
        })
    }

    /// Fetch a YouTube transcript and summarize it
    pub async fn summarize_youtube(
        &self,
        input: &YoutubeSummaryInput,
    ) -> Result<YoutubeSummaryOutput> {
        input.validate()?;
        log::info!("Running YouTube summary flow");

        let segments = self
            .transcripts
            .fetch_transcript(input.video_url.trim())
            .await?;
        if segments.is_empty() {
            return Err(AppError::TranscriptUnavailable(
                "no transcript segments for this video".to_string(),
            ));
        }

        let transcript = join_transcript(&segments);
        if transcript.trim().is_empty() {
            return Err(AppError::TranscriptUnavailable(
                "transcript contains no text".to_string(),
            ));
        }
        log::debug!(
            "Joined {} segments into {} characters",
            segments.len(),
            transcript.chars().count()
        );

        let prompt = self
            .prompts
            .video_summary(&transcript, input.summary_length)?;
        let summary = self
            .invoke(self.request(prompt))
            .await?
            .into_text_or(&self.config.fallback_summary);

        Ok(YoutubeSummaryOutput {
            summary,
            title: self.config.default_title.clone(),
        })
    }
}
