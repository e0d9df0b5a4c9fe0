//! Tutor chatbot flow

use super::FlowOrchestrator;
use crate::domain::models::{ChatInput, ChatOutput};
use crate::domain::schema::Validate;
use crate::error::Result;

impl FlowOrchestrator {
    /// Answer one student question
    ///
    /// Stateless: any earlier conversation must be passed in `input.history`.
    pub async fn chat(&self, input: &ChatInput) -> Result<ChatOutput> {
        input.validate()?;
        log::info!("Running chat flow ({} history turns)", input.history.len());

        let prompt = self.prompts.chat(input)?;
        let response = self
            .invoke(self.request(prompt))
            .await?
            .into_text_or(&self.config.fallback_response);

        Ok(ChatOutput { response })
    }
}
