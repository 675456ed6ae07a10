//! Spreadsheet exports for the event table.
//!
//! DESIGN
//! ======
//! CSV uses RFC-4180 quoting (every field quoted, embedded quotes doubled)
//! so property strings with commas and quotes import cleanly. The clipboard
//! variant is tab-separated with structured properties flattened to
//! `key: v1|v2; ...`, so a paste lands one event per row and one column per
//! field.

use crate::event::{PropertiesView, TrackedEvent};

pub const CSV_HEADER: &str = "Action,View,Click,Event Name,Event Properties";

// =============================================================================
// CSV
// =============================================================================

#[must_use]
pub fn to_csv(events: &[TrackedEvent]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for event in events {
        let row = [
            quote(&event.action),
            quote(&event.view),
            quote(&event.click),
            quote(&event.event_name),
            quote(&event.event_properties),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

// =============================================================================
// CLIPBOARD TSV
// =============================================================================

#[must_use]
pub fn to_clipboard_tsv(events: &[TrackedEvent]) -> String {
    let mut lines = vec!["Action\tView\tClick\tEvent Name\tEvent Properties".to_string()];
    for event in events {
        let row = [
            sanitize(&event.action),
            sanitize(&event.view),
            sanitize(&event.click),
            sanitize(&event.event_name),
            sanitize(&flatten_properties(event)),
        ];
        lines.push(row.join("\t"));
    }
    lines.join("\n")
}

/// Tabs and newlines would break the cell structure — collapse to spaces.
fn sanitize(field: &str) -> String {
    field.replace(['\t', '\n', '\r'], " ")
}

fn flatten_properties(event: &TrackedEvent) -> String {
    match event.properties() {
        PropertiesView::Structured(map) => map
            .iter()
            .map(|(key, value)| format!("{key}: {}", join_values(value)))
            .collect::<Vec<_>>()
            .join("; "),
        PropertiesView::Opaque(text) => text,
    }
}

fn join_values(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join("|"),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &serde_json::Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_string)
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
