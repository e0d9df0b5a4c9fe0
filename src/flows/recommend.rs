//! Course recommendation flow

use super::FlowOrchestrator;
use crate::domain::models::{RecommendationInput, RecommendationOutput};
use crate::domain::schema::Validate;
use crate::error::{AppError, Result};
use crate::ports::llm::{ModelResponse, ResponseFormat};

impl FlowOrchestrator {
    /// Recommend courses and topics from quiz results and learning history
    pub async fn recommend(&self, input: &RecommendationInput) -> Result<RecommendationOutput> {
        input.validate()?;
        log::info!(
            "Running recommendation flow ({} quiz results, {} history entries)",
            input.quiz_results.len(),
            input.learning_history.len()
        );

        let prompt = self.prompts.recommendation(input)?;
        let request = self
            .request(prompt)
            .with_response_format(ResponseFormat::Json);

        match self.invoke(request).await? {
            ModelResponse::Text(text) => parse_recommendations(&text),
            ModelResponse::Empty { reason } => {
                log::warn!(
                    "Recommendation model returned no text (reason: {}), returning no recommendations",
                    reason.as_deref().unwrap_or("unspecified")
                );
                Ok(RecommendationOutput::default())
            }
        }
    }
}

/// Parse and tidy the model's JSON answer
///
/// Models sometimes wrap JSON in a markdown code fence even in JSON mode.
fn parse_recommendations(text: &str) -> Result<RecommendationOutput> {
    let json = strip_code_fence(text);
    let output: RecommendationOutput = serde_json::from_str(json).map_err(|e| {
        AppError::InvalidOutput(format!("recommendations are not the expected JSON: {}", e))
    })?;

    Ok(RecommendationOutput {
        recommended_courses: tidy(output.recommended_courses),
        recommended_topics: tidy(output.recommended_topics),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop an optional language tag on the opening fence
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn tidy(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
