//! Event schema validation for reasoning-backend responses.
//!
//! DESIGN
//! ======
//! The backend replies with `{"events": [...]}`; refinement adds `"message"`.
//! Validation is all-or-nothing — a missing `events` array or a single
//! malformed item rejects the whole response, never a partial acceptance.
//!
//! Identity is assigned here. Generation always mints fresh ids, overriding
//! anything the backend supplied, so row identity is unique regardless of
//! backend behavior. Refinement keeps a supplied id when it is unique within
//! the result and mints otherwise — table rows stay stable across an edit
//! without ever duplicating identity.

use std::collections::HashSet;

use uuid::Uuid;

use crate::event::TrackedEvent;

/// Summary text used when the refinement backend omits its `message`.
pub const REFINE_FALLBACK_MESSAGE: &str = "I've updated the event list based on your feedback.";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The response carried no `events` array.
    #[error("response has no `events` array")]
    MissingEvents,

    /// An event record was missing a field or carried a non-string value.
    #[error("event {index}: missing or non-string field `{field}`")]
    BadField { index: usize, field: &'static str },
}

// =============================================================================
// PARSING
// =============================================================================

struct RawEvent {
    id: Option<Uuid>,
    action: String,
    view: String,
    click: String,
    event_name: String,
    event_properties: String,
}

impl RawEvent {
    fn into_event(self, id: Uuid) -> TrackedEvent {
        TrackedEvent {
            id,
            action: self.action,
            view: self.view,
            click: self.click,
            event_name: self.event_name,
            event_properties: self.event_properties,
        }
    }
}

fn field<'a>(item: &'a serde_json::Value, index: usize, name: &'static str) -> Result<&'a str, SchemaError> {
    item.get(name)
        .and_then(serde_json::Value::as_str)
        .ok_or(SchemaError::BadField { index, field: name })
}

fn parse_raw_events(raw: &serde_json::Value) -> Result<Vec<RawEvent>, SchemaError> {
    let events = raw
        .get("events")
        .and_then(serde_json::Value::as_array)
        .ok_or(SchemaError::MissingEvents)?;

    events
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Ok(RawEvent {
                id: item
                    .get("id")
                    .and_then(serde_json::Value::as_str)
                    .and_then(|s| s.parse().ok()),
                action: field(item, index, "action")?.to_string(),
                view: field(item, index, "view")?.to_string(),
                click: field(item, index, "click")?.to_string(),
                event_name: field(item, index, "eventName")?.to_string(),
                event_properties: field(item, index, "eventProperties")?.to_string(),
            })
        })
        .collect()
}

/// Validate a generation response. Every accepted record gets a fresh id;
/// backend-supplied ids are ignored.
pub fn parse_generated(raw: &serde_json::Value) -> Result<Vec<TrackedEvent>, SchemaError> {
    Ok(parse_raw_events(raw)?
        .into_iter()
        .map(|r| r.into_event(Uuid::new_v4()))
        .collect())
}

/// Validated refinement response: the full replacement event set plus the
/// backend's change summary.
#[derive(Debug)]
pub struct RefineOutcome {
    pub events: Vec<TrackedEvent>,
    pub message: String,
}

/// Validate a refinement response. A supplied id is preserved when unique
/// within the result; duplicates and absences get fresh ids.
pub fn parse_refined(raw: &serde_json::Value) -> Result<RefineOutcome, SchemaError> {
    let raw_events = parse_raw_events(raw)?;

    let mut seen = HashSet::new();
    let events = raw_events
        .into_iter()
        .map(|r| {
            let id = match r.id {
                Some(id) if seen.insert(id) => id,
                _ => fresh_unique(&mut seen),
            };
            r.into_event(id)
        })
        .collect();

    let message = raw
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map_or_else(|| REFINE_FALLBACK_MESSAGE.to_string(), str::to_string);

    Ok(RefineOutcome { events, message })
}

fn fresh_unique(seen: &mut HashSet<Uuid>) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if seen.insert(id) {
            return id;
        }
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
