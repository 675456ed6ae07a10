mod event;
mod export;
mod llm;
mod routes;
mod schema;
mod services;
mod state;
mod stats;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Reasoning backend (non-fatal: generation routes answer 503 if missing).
    let llm: Option<Arc<dyn llm::GenerateJson>> = match llm::client_from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "Gemini client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Gemini client not configured — event generation disabled");
            None
        }
    };

    // Access gate (non-fatal: verify route answers 503 if missing).
    let auth: Option<Arc<dyn services::auth::CredentialCheck>> = match services::auth::StaticPasscode::from_env() {
        Some(gate) => Some(Arc::new(gate)),
        None => {
            tracing::warn!("PASSCODE not set — access gate disabled");
            None
        }
    };

    let state = state::AppState::new(llm, auth);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "trackplan listening");
    axum::serve(listener, app).await.expect("server failed");
}
