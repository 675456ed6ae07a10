//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the in-memory session registry plus two optional subsystems: the
//! reasoning backend and the access gate. Either missing degrades the
//! matching routes at request time instead of failing startup.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::llm::GenerateJson;
use crate::services::auth::CredentialCheck;
use crate::services::conversation::Conversation;

/// Shared application state. Clone is required by Axum — all inner fields
/// are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions keyed by session id.
    pub sessions: Arc<RwLock<HashMap<Uuid, Conversation>>>,
    /// Reasoning backend. `None` when `GEMINI_API_KEY` is not configured.
    pub llm: Option<Arc<dyn GenerateJson>>,
    /// Access gate. `None` when no passcode is configured.
    pub auth: Option<Arc<dyn CredentialCheck>>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn GenerateJson>>, auth: Option<Arc<dyn CredentialCheck>>) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), llm, auth }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
