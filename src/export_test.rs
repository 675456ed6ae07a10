use super::*;
use uuid::Uuid;

fn event(action: &str, properties: &str) -> TrackedEvent {
    TrackedEvent {
        id: Uuid::new_v4(),
        action: action.into(),
        view: "view:pricing".into(),
        click: "click:subscribe-button".into(),
        event_name: "view:pricing:click:subscribe-button".into(),
        event_properties: properties.into(),
    }
}

// =========================================================================
// CSV
// =========================================================================

#[test]
fn csv_starts_with_header() {
    let csv = to_csv(&[]);
    assert_eq!(csv, format!("{CSV_HEADER}\n"));
}

#[test]
fn csv_one_row_per_event() {
    let events = vec![event("a", ""), event("b", "")];
    let csv = to_csv(&events);
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn csv_doubles_embedded_quotes() {
    let events = vec![event("Click \"Subscribe\"", r#"{"plan": "pro"}"#)];
    let csv = to_csv(&events);
    let row = csv.lines().nth(1).unwrap();
    assert!(row.contains(r#""Click ""Subscribe""""#));
    assert!(row.contains(r#""{""plan"": ""pro""}""#));
}

#[test]
fn csv_commas_stay_inside_quoted_fields() {
    let events = vec![event("one, two, three", "")];
    let csv = to_csv(&events);
    let row = csv.lines().nth(1).unwrap();
    // Five fields — the embedded commas are quoted, not separators.
    assert!(row.starts_with("\"one, two, three\","));
    assert_eq!(row.matches("\",\"").count(), 4);
}

// =========================================================================
// clipboard TSV
// =========================================================================

#[test]
fn tsv_flattens_structured_properties() {
    let events = vec![event("a", r#"{"plan-type": ["free", "pro"], "source": "header"}"#)];
    let tsv = to_clipboard_tsv(&events);
    let row = tsv.lines().nth(1).unwrap();
    let properties = row.split('\t').nth(4).unwrap();
    assert_eq!(properties, "plan-type: free|pro; source: header");
}

#[test]
fn tsv_opaque_properties_pass_through() {
    let events = vec![event("a", "Plan: free or pro")];
    let tsv = to_clipboard_tsv(&events);
    let row = tsv.lines().nth(1).unwrap();
    assert!(row.ends_with("Plan: free or pro"));
}

#[test]
fn tsv_has_five_columns() {
    let events = vec![event("a", "")];
    let tsv = to_clipboard_tsv(&events);
    for line in tsv.lines() {
        assert_eq!(line.split('\t').count(), 5);
    }
}

#[test]
fn tsv_sanitizes_embedded_tabs_and_newlines() {
    let events = vec![event("line\none\ttab", "")];
    let tsv = to_clipboard_tsv(&events);
    let row = tsv.lines().nth(1).unwrap();
    assert!(row.starts_with("line one tab\t"));
}

#[test]
fn tsv_non_string_property_values_render() {
    let events = vec![event("a", r#"{"count": 3, "enabled": true}"#)];
    let tsv = to_clipboard_tsv(&events);
    let row = tsv.lines().nth(1).unwrap();
    let properties = row.split('\t').nth(4).unwrap();
    assert_eq!(properties, "count: 3; enabled: true");
}
