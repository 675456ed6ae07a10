//! Core conversation types — tracked events, chat messages, phases.
//!
//! DESIGN
//! ======
//! `TrackedEvent` mirrors the wire shape the table UI consumes (camelCase
//! field names). `id` exists for row identity and deletion only; outbound
//! payloads to the reasoning backend never carry it.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current time as milliseconds since Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// TRACKED EVENT
// =============================================================================

/// One analytics instrumentation point.
///
/// `event_name` is derived-but-stored: the backend is responsible for keeping
/// it consistent with `view`/`click`, and the client does not re-derive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    pub id: Uuid,
    pub action: String,
    /// Page identifier, convention `view:<name>`.
    pub view: String,
    /// Element identifier, convention `click:<name>`, or empty for view-only.
    pub click: String,
    pub event_name: String,
    /// Empty string, or a JSON-object-literal string of display hints.
    pub event_properties: String,
}

/// Display-time reading of `event_properties`. The backend emits either a
/// JSON object in a string or arbitrary text; a failed parse falls back to
/// the opaque form and is never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesView {
    Structured(serde_json::Map<String, serde_json::Value>),
    Opaque(String),
}

impl TrackedEvent {
    #[must_use]
    pub fn properties(&self) -> PropertiesView {
        match serde_json::from_str::<serde_json::Value>(&self.event_properties) {
            Ok(serde_json::Value::Object(map)) => PropertiesView::Structured(map),
            _ => PropertiesView::Opaque(self.event_properties.clone()),
        }
    }
}

// =============================================================================
// CHAT MESSAGE
// =============================================================================

/// Author of a conversation turn. Exactly two variants — there is no
/// system-authored visible role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    /// Milliseconds since Unix epoch. Ordering/display only.
    pub timestamp: i64,
    /// Image payload attached to a user turn, present only when the
    /// triggering input included one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, image_data: Option<String>) -> Self {
        Self { id: Uuid::new_v4(), role: Role::User, text: text.into(), timestamp: now_ms(), image_data }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), role: Role::Model, text: text.into(), timestamp: now_ms(), image_data: None }
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// Request phase of a session. At most one backend request is in flight,
/// so `Generating`/`Refining` also mean "input disabled".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Generating,
    Refining,
}

impl Phase {
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Generating | Phase::Refining)
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
