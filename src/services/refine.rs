//! Refinement service — current events + instruction → replacement set.
//!
//! DESIGN
//! ======
//! Full replace, never a patch: the backend returns the complete desired
//! list, unaffected events included, and the caller swaps it in wholesale.
//! Local row ids are stripped from the outbound snapshot — identity is a
//! table concern the backend never sees.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::event::TrackedEvent;
use crate::llm::{GenerateJson, LlmError, Part};
use crate::schema::{self, RefineOutcome, SchemaError};

const SYSTEM_INSTRUCTION: &str = r#"You are an Amplitude event tracking expert. You help refine and improve event tracking specifications based on user feedback.

IMPORTANT NAMING RULES:
- All identifiers must use lowercase letters and hyphens ONLY (no underscores or spaces)
- eventName format:
  - For clicks: "view:<page>:click:<element>" (e.g., "view:pricing:click:submit-button")
  - For view-only: "view:<page>" (e.g., "view:pricing")
- eventProperties format:
  - JSON string of relevant context-based properties with possible values
  - Use empty string "" if no relevant properties exist
  - Keys and values must use lowercase with hyphens (e.g., "plan-type", "cta-location")"#;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    #[error("instruction is required")]
    EmptyInstruction,
    #[error("event refinement failed: {0}")]
    Backend(#[from] LlmError),
    #[error("event refinement returned a malformed response: {0}")]
    Schema(#[from] SchemaError),
}

/// Event shape sent upstream — everything but the local id.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboundEvent<'a> {
    action: &'a str,
    view: &'a str,
    click: &'a str,
    event_name: &'a str,
    event_properties: &'a str,
}

impl<'a> From<&'a TrackedEvent> for OutboundEvent<'a> {
    fn from(event: &'a TrackedEvent) -> Self {
        Self {
            action: &event.action,
            view: &event.view,
            click: &event.click,
            event_name: &event.event_name,
            event_properties: &event.event_properties,
        }
    }
}

// =============================================================================
// REQUEST CONSTRUCTION
// =============================================================================

fn response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "events": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "action": { "type": "string" },
                        "view": { "type": "string" },
                        "click": { "type": "string" },
                        "eventName": { "type": "string" },
                        "eventProperties": { "type": "string" }
                    },
                    "required": ["action", "view", "click", "eventName", "eventProperties"]
                }
            },
            "message": { "type": "string" }
        },
        "required": ["events", "message"]
    })
}

fn build_system(events: &[TrackedEvent], instruction: &str) -> String {
    let snapshot: Vec<OutboundEvent> = events.iter().map(OutboundEvent::from).collect();
    let snapshot_json = serde_json::to_string_pretty(&snapshot).unwrap_or_default();

    format!(
        "{SYSTEM_INSTRUCTION}\n\nCurrent events:\n{snapshot_json}\n\nUser instruction: {instruction}\n\n\
         Apply the user's requested changes to the events. Return the updated events and a brief \
         explanation of what was changed. Ensure all identifiers follow the naming rules, eventName \
         follows the correct format, and eventProperties are meaningful or empty strings."
    )
}

// =============================================================================
// REFINEMENT
// =============================================================================

/// Produce a replacement event set plus a change summary from the current
/// events and a free-text instruction.
///
/// # Errors
///
/// Returns [`RefineError::EmptyInstruction`] without a backend call when the
/// instruction is blank; otherwise surfaces backend and schema failures.
pub async fn refine_events(
    llm: &Arc<dyn GenerateJson>,
    events: &[TrackedEvent],
    instruction: &str,
) -> Result<RefineOutcome, RefineError> {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(RefineError::EmptyInstruction);
    }

    let system = build_system(events, instruction);
    let parts = [Part::Text(format!("Please refine these Amplitude events according to: {instruction}"))];

    let raw = llm
        .generate_json(&system, &parts, &response_schema())
        .await?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let outcome = schema::parse_refined(&value)?;

    info!(count = outcome.events.len(), "refine: replacement set produced");
    Ok(outcome)
}

#[cfg(test)]
#[path = "refine_test.rs"]
mod tests;
