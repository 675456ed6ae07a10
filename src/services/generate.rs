//! Generation service — description and/or screenshot → full event set.
//!
//! DESIGN
//! ======
//! Builds the multimodal prompt (data-URI header stripped from the image,
//! generic instruction substituted when only a screenshot is supplied),
//! calls the backend with the events response schema, validates, and mints
//! fresh row ids. No retries live here — a failed call surfaces once and
//! re-sending is the user's move.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::event::TrackedEvent;
use crate::llm::{GenerateJson, LlmError, Part};
use crate::schema::{self, SchemaError};

pub(crate) const SYSTEM_INSTRUCTION: &str = r#"You are an Amplitude event tracking expert. Your task is to analyze product features and generate precise Amplitude event tracking specifications.

Generate tracking events that:
1. view: page identifier using lowercase with hyphens (e.g., "home", "pricing", "checkout")
2. click: click element identifier using lowercase with hyphens, or empty string "" for view-only events (e.g., "submit-button", "sign-up-cta", "footer-help")
3. eventName: FULL event name combining view and click:
   - For clicks: "view:<page>:click:<element>" (e.g., "view:pricing:click:submit-button")
   - For view-only: "view:<page>" (e.g., "view:pricing")
4. action: Human-readable description (e.g., "Click on submit button on pricing page")
5. eventProperties: JSON string of relevant context-based properties with possible values
   - Generate ONLY if there are meaningful properties to track based on the feature context
   - For empty properties, use empty string ""
   - Examples: "{\"plan-type\": [\"free\", \"pro\", \"enterprise\"]}" or "{\"cta-location\": [\"header\", \"footer\"]}"

IMPORTANT NAMING RULES:
- Use lowercase letters and hyphens ONLY (no underscores or spaces)
- eventName must ALWAYS follow format: "view:<page>:click:<element>" for clicks or "view:<page>" for view-only
- eventProperties keys and values must use lowercase with hyphens (e.g., "plan-type", "cta-location")

Return ONLY valid JSON matching the schema."#;

/// Instruction used when the caller supplied an image but no description.
const SCREENSHOT_INSTRUCTION: &str = "Generate a list of tracking events based on this UI screenshot.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("description or image is required")]
    NoInput,
    #[error("event generation failed: {0}")]
    Backend(#[from] LlmError),
    #[error("event generation returned a malformed response: {0}")]
    Schema(#[from] SchemaError),
}

/// Generation input. At least one of the two must be non-empty; the caller
/// validates before any backend call.
#[derive(Debug, Clone, Default)]
pub struct GenerateInput {
    pub description: String,
    /// Screenshot as a data URI or bare base64 payload.
    pub image: Option<String>,
}

impl GenerateInput {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.trim().is_empty() && self.image.as_deref().is_none_or(|i| i.trim().is_empty())
    }
}

// =============================================================================
// REQUEST CONSTRUCTION
// =============================================================================

pub(crate) fn response_schema() -> serde_json::Value {
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
            }
        },
        "required": ["events"]
    })
}

/// Strip a `data:<mime>;base64,` header, returning (mime type, payload).
/// A bare base64 string passes through with the default mime type.
pub(crate) fn strip_data_uri(image: &str) -> (&str, &str) {
    if let Some(rest) = image.strip_prefix("data:") {
        if let Some((header, payload)) = rest.split_once(";base64,") {
            let mime = if header.is_empty() { "image/png" } else { header };
            return (mime, payload);
        }
    }
    ("image/png", image)
}

fn build_parts(input: &GenerateInput) -> Vec<Part> {
    let mut parts = Vec::new();

    if let Some(image) = input.image.as_deref().filter(|i| !i.trim().is_empty()) {
        let (mime_type, data) = strip_data_uri(image.trim());
        parts.push(Part::InlineImage { mime_type: mime_type.to_string(), data: data.to_string() });
    }

    let description = input.description.trim();
    let text = if description.is_empty() {
        SCREENSHOT_INSTRUCTION.to_string()
    } else {
        format!("Feature Description: {description}\n\nGenerate appropriate Amplitude events for tracking this feature.")
    };
    parts.push(Part::Text(text));

    parts
}

// =============================================================================
// GENERATION
// =============================================================================

/// Produce a full event set from a description and/or screenshot.
///
/// # Errors
///
/// Returns [`GenerateError::NoInput`] without a backend call when both
/// inputs are empty; otherwise surfaces backend and schema failures.
pub async fn generate_events(
    llm: &Arc<dyn GenerateJson>,
    input: &GenerateInput,
) -> Result<Vec<TrackedEvent>, GenerateError> {
    if input.is_empty() {
        return Err(GenerateError::NoInput);
    }

    let parts = build_parts(input);
    let raw = llm
        .generate_json(SYSTEM_INSTRUCTION, &parts, &response_schema())
        .await?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let events = schema::parse_generated(&value)?;

    info!(count = events.len(), "generate: events produced");
    Ok(events)
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
