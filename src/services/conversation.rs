//! Conversation state machine — message log, event table, in-flight request.
//!
//! DESIGN
//! ======
//! Each session owns its events and message log exclusively; all mutation
//! happens under the registry lock. Backend calls are awaited with the lock
//! released, so a concurrent `stop` or `reset` can clear the session's
//! `active_request` marker; the completion path re-checks the marker and
//! silently discards a late result instead of trying to abort the transport.
//!
//! LIFECYCLE
//! =========
//! 1. `begin_*`: guards → optimistic user message → phase transition → fresh
//!    request marker
//! 2. the caller awaits the backend with no lock held
//! 3. `complete_*`: marker check → apply or discard → phase back to Idle

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::event::{ChatMessage, Phase, TrackedEvent};
use crate::schema::RefineOutcome;
use crate::services::generate::{GenerateError, GenerateInput};
use crate::services::refine::RefineError;
use crate::state::AppState;

/// Fixed model message appended when the user stops an in-flight request.
pub const STOPPED_MESSAGE: &str = "Stopped by user.";
/// Fixed model message appended when refinement fails.
pub const REFINE_ERROR_MESSAGE: &str = "Sorry, I encountered an error updating the events.";
/// User-message placeholder when generation runs from a screenshot alone.
pub const SCREENSHOT_PLACEHOLDER: &str = "Generate events from this screenshot.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
    #[error("a request is already in flight")]
    Busy,
    #[error("description or image is required")]
    NoInput,
    #[error("message text is required")]
    EmptyMessage,
}

/// One conversational session: event table + chat log + request phase.
#[derive(Debug, Default)]
pub struct Conversation {
    pub events: Vec<TrackedEvent>,
    pub messages: Vec<ChatMessage>,
    pub phase: Phase,
    /// Discard marker for the single in-flight request. `stop` and `reset`
    /// clear it; a completion whose ticket no longer matches is dropped.
    active_request: Option<Uuid>,
}

/// Point-in-time view of a session, as served to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: Phase,
    pub events: Vec<TrackedEvent>,
    pub messages: Vec<ChatMessage>,
}

/// Ticket tying an in-flight backend call to the session state it may mutate.
#[derive(Debug, Clone, Copy)]
pub struct RequestTicket {
    session_id: Uuid,
    request_id: Uuid,
}

/// What happened when a completed backend call reached the session.
#[derive(Debug)]
pub enum CompletionStatus {
    /// Result applied to the session.
    Committed,
    /// Backend failure surfaced to the caller; the event table is untouched.
    Failed(String),
    /// The request was stopped or superseded; the result was dropped.
    Discarded,
}

// =============================================================================
// SESSION LIFECYCLE
// =============================================================================

/// Create a new empty session and return its id.
pub async fn create_session(state: &AppState) -> Uuid {
    let id = Uuid::new_v4();
    let mut sessions = state.sessions.write().await;
    sessions.insert(id, Conversation::default());
    info!(session_id = %id, "conversation: session created");
    id
}

/// Read a point-in-time view of a session.
///
/// # Errors
///
/// Returns [`ConversationError::NotFound`] for an unknown session.
pub async fn snapshot(state: &AppState, id: Uuid) -> Result<Snapshot, ConversationError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ConversationError::NotFound(id))?;
    Ok(Snapshot { phase: session.phase, events: session.events.clone(), messages: session.messages.clone() })
}

/// Clear events, messages, and any pending request marker unconditionally.
/// Valid in any phase — an in-flight request's eventual result is abandoned.
///
/// # Errors
///
/// Returns [`ConversationError::NotFound`] for an unknown session.
pub async fn reset(state: &AppState, id: Uuid) -> Result<(), ConversationError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ConversationError::NotFound(id))?;
    *session = Conversation::default();
    info!(session_id = %id, "conversation: session reset");
    Ok(())
}

// =============================================================================
// GENERATION
// =============================================================================

/// Start a generation: guard, reset the log to one optimistic user message,
/// and hand back the ticket the completion must present.
///
/// # Errors
///
/// [`ConversationError::NoInput`] when both inputs are empty (no state
/// change, no backend call), [`ConversationError::Busy`] when a request is
/// already in flight.
pub async fn begin_generate(
    state: &AppState,
    id: Uuid,
    input: &GenerateInput,
) -> Result<RequestTicket, ConversationError> {
    if input.is_empty() {
        return Err(ConversationError::NoInput);
    }

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ConversationError::NotFound(id))?;
    if session.phase.is_busy() {
        return Err(ConversationError::Busy);
    }

    let text = if input.description.trim().is_empty() {
        SCREENSHOT_PLACEHOLDER.to_string()
    } else {
        input.description.trim().to_string()
    };
    let image = input.image.clone().filter(|i| !i.trim().is_empty());

    // A new generation resets the log atomically with the request it starts.
    session.messages = vec![ChatMessage::user(text, image)];
    session.phase = Phase::Generating;
    let request_id = Uuid::new_v4();
    session.active_request = Some(request_id);

    info!(session_id = %id, "conversation: generation started");
    Ok(RequestTicket { session_id: id, request_id })
}

/// Apply a finished generation, unless the ticket has been invalidated.
pub async fn complete_generate(
    state: &AppState,
    ticket: RequestTicket,
    outcome: Result<Vec<TrackedEvent>, GenerateError>,
) -> CompletionStatus {
    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&ticket.session_id) else {
        return CompletionStatus::Discarded;
    };
    if session.active_request != Some(ticket.request_id) {
        info!(session_id = %ticket.session_id, "conversation: stale generation result discarded");
        return CompletionStatus::Discarded;
    }

    session.active_request = None;
    session.phase = Phase::Idle;

    match outcome {
        Ok(events) => {
            let count = events.len();
            session.events = events;
            session.messages.push(ChatMessage::model(format!(
                "I've analyzed your input and generated {count} events. Review the table below. \
                 You can chat with me to refine them."
            )));
            info!(session_id = %ticket.session_id, count, "conversation: generation committed");
            CompletionStatus::Committed
        }
        Err(e) => {
            warn!(session_id = %ticket.session_id, error = %e, "conversation: generation failed");
            CompletionStatus::Failed(e.to_string())
        }
    }
}

// =============================================================================
// REFINEMENT
// =============================================================================

/// Start a refinement: guard, optimistically append the user message, and
/// return the ticket plus the event snapshot the backend should work from.
///
/// # Errors
///
/// [`ConversationError::EmptyMessage`] for blank text,
/// [`ConversationError::Busy`] when a request is already in flight.
pub async fn begin_refine(
    state: &AppState,
    id: Uuid,
    text: &str,
) -> Result<(RequestTicket, Vec<TrackedEvent>), ConversationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ConversationError::EmptyMessage);
    }

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ConversationError::NotFound(id))?;
    if session.phase.is_busy() {
        return Err(ConversationError::Busy);
    }

    session.messages.push(ChatMessage::user(text, None));
    session.phase = Phase::Refining;
    let request_id = Uuid::new_v4();
    session.active_request = Some(request_id);

    info!(session_id = %id, "conversation: refinement started");
    Ok((RequestTicket { session_id: id, request_id }, session.events.clone()))
}

/// Apply a finished refinement, unless the ticket has been invalidated.
/// Success replaces the event table wholesale; failure appends the fixed
/// inline error message and leaves the table bit-identical.
pub async fn complete_refine(
    state: &AppState,
    ticket: RequestTicket,
    outcome: Result<RefineOutcome, RefineError>,
) -> CompletionStatus {
    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&ticket.session_id) else {
        return CompletionStatus::Discarded;
    };
    if session.active_request != Some(ticket.request_id) {
        info!(session_id = %ticket.session_id, "conversation: stale refinement result discarded");
        return CompletionStatus::Discarded;
    }

    session.active_request = None;
    session.phase = Phase::Idle;

    match outcome {
        Ok(refined) => {
            let count = refined.events.len();
            session.events = refined.events;
            session.messages.push(ChatMessage::model(refined.message));
            info!(session_id = %ticket.session_id, count, "conversation: refinement committed");
            CompletionStatus::Committed
        }
        Err(e) => {
            warn!(session_id = %ticket.session_id, error = %e, "conversation: refinement failed");
            session.messages.push(ChatMessage::model(REFINE_ERROR_MESSAGE));
            CompletionStatus::Failed(e.to_string())
        }
    }
}

// =============================================================================
// STOP / LOCAL EDITS
// =============================================================================

/// Stop the in-flight request: force Idle, invalidate the marker, and append
/// the fixed stop notice. Returns `false` (no-op) when the session is idle.
///
/// # Errors
///
/// Returns [`ConversationError::NotFound`] for an unknown session.
pub async fn stop(state: &AppState, id: Uuid) -> Result<bool, ConversationError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ConversationError::NotFound(id))?;
    if !session.phase.is_busy() {
        return Ok(false);
    }

    session.phase = Phase::Idle;
    session.active_request = None;
    session.messages.push(ChatMessage::model(STOPPED_MESSAGE));
    info!(session_id = %id, "conversation: request stopped by user");
    Ok(true)
}

/// Remove one event locally. Valid in any phase, no backend call; returns
/// `false` when the id is absent.
///
/// # Errors
///
/// Returns [`ConversationError::NotFound`] for an unknown session.
pub async fn delete_event(state: &AppState, id: Uuid, event_id: Uuid) -> Result<bool, ConversationError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ConversationError::NotFound(id))?;
    let before = session.events.len();
    session.events.retain(|e| e.id != event_id);
    let removed = session.events.len() < before;
    if removed {
        info!(session_id = %id, %event_id, "conversation: event deleted");
    }
    Ok(removed)
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
