//! Access-gate route.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::event::now_ms;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct VerifyBody {
    #[serde(default)]
    pub passcode: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub ok: bool,
    /// Milliseconds since Unix epoch; the client persists this alongside its
    /// authenticated flag.
    pub authenticated_at: i64,
}

/// `POST /api/auth/verify` — check the shared passcode.
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyBody>,
) -> Result<Json<VerifyResponse>, StatusCode> {
    let Some(gate) = &state.auth else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    if gate.validate(&body.passcode) {
        Ok(Json(VerifyResponse { ok: true, authenticated_at: now_ms() }))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
