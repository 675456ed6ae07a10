//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the session, export, and auth endpoints under a permissive CORS
//! layer — the browser client is served elsewhere and talks to this API
//! cross-origin.

pub mod auth;
pub mod sessions;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/sessions", post(sessions::create))
        .route("/api/sessions/{id}", get(sessions::snapshot))
        .route("/api/sessions/{id}/generate", post(sessions::generate))
        .route("/api/sessions/{id}/message", post(sessions::message))
        .route("/api/sessions/{id}/stop", post(sessions::stop))
        .route("/api/sessions/{id}/reset", post(sessions::reset))
        .route("/api/sessions/{id}/events/{event_id}", delete(sessions::delete_event))
        .route("/api/sessions/{id}/export.csv", get(sessions::export_csv))
        .route("/api/sessions/{id}/export.tsv", get(sessions::export_tsv))
        .route("/api/sessions/{id}/stats", get(sessions::stats))
        .route("/api/auth/verify", post(auth::verify))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
