//! Session routes — the generation/refinement protocol surface.
//!
//! DESIGN
//! ======
//! Handlers orchestrate `begin → await backend → complete` and never hold
//! the session lock across the backend call, so `stop` and `reset` stay
//! responsive while a request is in flight. Service errors map to status
//! codes here; the error body mirrors the `{ "error": ... }` shape the
//! original endpoints used.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::conversation::{self, CompletionStatus, ConversationError, Snapshot};
use crate::services::generate::{self, GenerateInput};
use crate::services::refine;
use crate::state::AppState;
use crate::{export, stats};

// =============================================================================
// ERROR MAPPING
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: message.into() }))
}

fn conversation_error(err: &ConversationError) -> ApiError {
    let status = match err {
        ConversationError::NotFound(_) => StatusCode::NOT_FOUND,
        ConversationError::Busy => StatusCode::CONFLICT,
        ConversationError::NoInput | ConversationError::EmptyMessage => StatusCode::BAD_REQUEST,
    };
    api_error(status, err.to_string())
}

fn require_backend(state: &AppState) -> Result<std::sync::Arc<dyn crate::llm::GenerateJson>, ApiError> {
    state
        .llm
        .clone()
        .ok_or_else(|| api_error(StatusCode::SERVICE_UNAVAILABLE, "event generation is not configured"))
}

// =============================================================================
// SESSION LIFECYCLE
// =============================================================================

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

/// `POST /api/sessions` — create a new empty session.
pub async fn create(State(state): State<AppState>) -> (StatusCode, Json<CreatedResponse>) {
    let id = conversation::create_session(&state).await;
    (StatusCode::CREATED, Json(CreatedResponse { id }))
}

/// `GET /api/sessions/{id}` — point-in-time snapshot.
pub async fn snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Snapshot>, ApiError> {
    conversation::snapshot(&state, id)
        .await
        .map(Json)
        .map_err(|e| conversation_error(&e))
}

/// `POST /api/sessions/{id}/reset` — unconditional clear.
pub async fn reset(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Snapshot>, ApiError> {
    conversation::reset(&state, id)
        .await
        .map_err(|e| conversation_error(&e))?;
    conversation::snapshot(&state, id)
        .await
        .map(Json)
        .map_err(|e| conversation_error(&e))
}

// =============================================================================
// GENERATION / REFINEMENT
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// `POST /api/sessions/{id}/generate` — run a generation to completion.
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<Snapshot>, ApiError> {
    let llm = require_backend(&state)?;
    let input = GenerateInput { description: body.description, image: body.image_base64 };

    let ticket = conversation::begin_generate(&state, id, &input)
        .await
        .map_err(|e| conversation_error(&e))?;

    let outcome = generate::generate_events(&llm, &input).await;

    match conversation::complete_generate(&state, ticket, outcome).await {
        CompletionStatus::Failed(message) => Err(api_error(StatusCode::BAD_GATEWAY, message)),
        CompletionStatus::Committed | CompletionStatus::Discarded => conversation::snapshot(&state, id)
            .await
            .map(Json)
            .map_err(|e| conversation_error(&e)),
    }
}

#[derive(Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub text: String,
}

/// `POST /api/sessions/{id}/message` — run a refinement to completion.
/// A backend failure still answers 200: the fixed inline error message is
/// already in the log and the event table is untouched.
pub async fn message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MessageBody>,
) -> Result<Json<Snapshot>, ApiError> {
    let llm = require_backend(&state)?;

    let (ticket, events) = conversation::begin_refine(&state, id, &body.text)
        .await
        .map_err(|e| conversation_error(&e))?;

    let outcome = refine::refine_events(&llm, &events, &body.text).await;
    let _status = conversation::complete_refine(&state, ticket, outcome).await;

    conversation::snapshot(&state, id)
        .await
        .map(Json)
        .map_err(|e| conversation_error(&e))
}

/// `POST /api/sessions/{id}/stop` — cancel the in-flight request.
pub async fn stop(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Snapshot>, ApiError> {
    conversation::stop(&state, id)
        .await
        .map_err(|e| conversation_error(&e))?;
    conversation::snapshot(&state, id)
        .await
        .map(Json)
        .map_err(|e| conversation_error(&e))
}

/// `DELETE /api/sessions/{id}/events/{event_id}` — local removal.
pub async fn delete_event(
    State(state): State<AppState>,
    Path((id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = conversation::delete_event(&state, id, event_id)
        .await
        .map_err(|e| conversation_error(&e))?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

// =============================================================================
// EXPORTS / STATS
// =============================================================================

/// `GET /api/sessions/{id}/export.csv` — spreadsheet download.
pub async fn export_csv(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, ApiError> {
    let snap = conversation::snapshot(&state, id)
        .await
        .map_err(|e| conversation_error(&e))?;
    let body = export::to_csv(&snap.events);
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"tracking_events.csv\""),
        ],
        body,
    )
        .into_response())
}

/// `GET /api/sessions/{id}/export.tsv` — clipboard-ready variant.
pub async fn export_tsv(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, ApiError> {
    let snap = conversation::snapshot(&state, id)
        .await
        .map_err(|e| conversation_error(&e))?;
    let body = export::to_clipboard_tsv(&snap.events);
    Ok(([(CONTENT_TYPE, "text/tab-separated-values; charset=utf-8")], body).into_response())
}

/// `GET /api/sessions/{id}/stats` — dashboard aggregates.
pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<stats::TableStats>, ApiError> {
    let snap = conversation::snapshot(&state, id)
        .await
        .map_err(|e| conversation_error(&e))?;
    Ok(Json(stats::compute(&snap.events)))
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
