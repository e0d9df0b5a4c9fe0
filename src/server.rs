//! HTTP surface over the command layer

use crate::commands::{CommandError, CommandErrorKind, Commands};
use crate::config::ServerConfig;
use crate::domain::models::{
    AudioSummaryInput, AudioSummaryOutput, ChatInput, ChatOutput, DocumentSummaryInput,
    RecommendationInput, RecommendationOutput, SummaryOutput, TextSummaryInput,
    YoutubeSummaryInput, YoutubeSummaryOutput,
};
use crate::domain::schema::ValidationError;
use crate::flows::FlowKind;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub commands: Commands,
}

type Shared = State<Arc<AppState>>;
type Body<T> = Result<Json<T>, JsonRejection>;

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/flows", get(list_flows))
        .route("/api/flows/:name", post(dispatch))
        .route("/api/chat", post(chat))
        .route("/api/recommendations", post(recommend))
        .route("/api/summaries/text", post(summarize_text))
        .route("/api/summaries/document", post(summarize_document))
        .route("/api/summaries/audio", post(summarize_audio))
        .route("/api/summaries/youtube", post(summarize_youtube))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(Arc::new(state))
}

pub fn status_for(kind: CommandErrorKind) -> StatusCode {
    match kind {
        CommandErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        CommandErrorKind::UnknownFlow => StatusCode::NOT_FOUND,
        CommandErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        CommandErrorKind::MediaUnprocessable | CommandErrorKind::TranscriptUnavailable => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CommandErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        CommandErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        (status_for(self.kind), Json(self)).into_response()
    }
}

/// Unwraps a JSON body, reporting unreadable bodies as invalid input
fn body<T>(payload: Body<T>) -> Result<T, CommandError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            log::info!("Rejected request body over the size limit");
            Err(CommandError::payload_too_large())
        }
        Err(rejection) => Err(ValidationError::single("payload", rejection.body_text()).into()),
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_flows(State(state): Shared) -> Json<Vec<FlowKind>> {
    Json(state.commands.available_flows())
}

async fn dispatch(
    State(state): Shared,
    Path(name): Path<String>,
    payload: Body<Value>,
) -> Result<Json<Value>, CommandError> {
    let payload = body(payload)?;
    Ok(Json(state.commands.dispatch(&name, payload).await?))
}

async fn chat(State(state): Shared, payload: Body<ChatInput>) -> Result<Json<ChatOutput>, CommandError> {
    Ok(Json(state.commands.chat(body(payload)?).await?))
}

async fn recommend(
    State(state): Shared,
    payload: Body<RecommendationInput>,
) -> Result<Json<RecommendationOutput>, CommandError> {
    Ok(Json(state.commands.recommend(body(payload)?).await?))
}

async fn summarize_text(
    State(state): Shared,
    payload: Body<TextSummaryInput>,
) -> Result<Json<SummaryOutput>, CommandError> {
    Ok(Json(state.commands.summarize_text(body(payload)?).await?))
}

async fn summarize_document(
    State(state): Shared,
    payload: Body<DocumentSummaryInput>,
) -> Result<Json<SummaryOutput>, CommandError> {
    Ok(Json(state.commands.summarize_document(body(payload)?).await?))
}

async fn summarize_audio(
    State(state): Shared,
    payload: Body<AudioSummaryInput>,
) -> Result<Json<AudioSummaryOutput>, CommandError> {
    Ok(Json(state.commands.summarize_audio(body(payload)?).await?))
}

async fn summarize_youtube(
    State(state): Shared,
    payload: Body<YoutubeSummaryInput>,
) -> Result<Json<YoutubeSummaryOutput>, CommandError> {
    Ok(Json(state.commands.summarize_youtube(body(payload)?).await?))
}
