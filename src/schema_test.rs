use super::*;
use serde_json::json;

fn one_event_response() -> serde_json::Value {
    json!({
        "events": [{
            "action": "Click subscribe",
            "view": "view:pricing",
            "click": "click:subscribe-button",
            "eventName": "view:pricing:click:subscribe-button",
            "eventProperties": ""
        }]
    })
}

// =========================================================================
// parse_generated
// =========================================================================

#[test]
fn generated_valid_single_event() {
    let events = parse_generated(&one_event_response()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "Click subscribe");
    assert_eq!(events[0].view, "view:pricing");
    assert_eq!(events[0].click, "click:subscribe-button");
    assert_eq!(events[0].event_name, "view:pricing:click:subscribe-button");
    assert_eq!(events[0].event_properties, "");
}

#[test]
fn generated_ids_fresh_and_unique_despite_backend_duplicates() {
    let raw = json!({
        "events": [
            { "id": "11111111-1111-1111-1111-111111111111", "action": "a", "view": "view:home",
              "click": "", "eventName": "view:home", "eventProperties": "" },
            { "id": "11111111-1111-1111-1111-111111111111", "action": "b", "view": "view:home",
              "click": "click:cta", "eventName": "view:home:click:cta", "eventProperties": "" }
        ]
    });
    let events = parse_generated(&raw).unwrap();
    assert_ne!(events[0].id, events[1].id);
    assert_ne!(events[0].id.to_string(), "11111111-1111-1111-1111-111111111111");
}

#[test]
fn generated_preserves_backend_order() {
    let raw = json!({
        "events": [
            { "action": "first", "view": "view:a", "click": "", "eventName": "view:a", "eventProperties": "" },
            { "action": "second", "view": "view:b", "click": "", "eventName": "view:b", "eventProperties": "" }
        ]
    });
    let events = parse_generated(&raw).unwrap();
    assert_eq!(events[0].action, "first");
    assert_eq!(events[1].action, "second");
}

#[test]
fn generated_missing_events_is_error() {
    let err = parse_generated(&json!({ "items": [] })).unwrap_err();
    assert!(matches!(err, SchemaError::MissingEvents));
}

#[test]
fn generated_events_not_array_is_error() {
    let err = parse_generated(&json!({ "events": 42 })).unwrap_err();
    assert!(matches!(err, SchemaError::MissingEvents));
}

#[test]
fn generated_missing_field_is_error() {
    let raw = json!({
        "events": [{ "action": "a", "view": "view:a", "click": "", "eventProperties": "" }]
    });
    let err = parse_generated(&raw).unwrap_err();
    assert!(matches!(err, SchemaError::BadField { index: 0, field: "eventName" }));
}

#[test]
fn generated_non_string_field_is_error() {
    let raw = json!({
        "events": [{ "action": "a", "view": "view:a", "click": "", "eventName": "view:a", "eventProperties": {} }]
    });
    let err = parse_generated(&raw).unwrap_err();
    assert!(matches!(err, SchemaError::BadField { index: 0, field: "eventProperties" }));
}

#[test]
fn generated_no_partial_acceptance() {
    // One malformed item rejects the whole response.
    let raw = json!({
        "events": [
            { "action": "ok", "view": "view:a", "click": "", "eventName": "view:a", "eventProperties": "" },
            { "action": "bad", "view": "view:b" }
        ]
    });
    assert!(parse_generated(&raw).is_err());
}

#[test]
fn generated_empty_list_is_valid() {
    let events = parse_generated(&json!({ "events": [] })).unwrap();
    assert!(events.is_empty());
}

// =========================================================================
// parse_refined
// =========================================================================

#[test]
fn refined_preserves_supplied_id() {
    let raw = json!({
        "events": [{ "id": "22222222-2222-2222-2222-222222222222", "action": "a", "view": "view:a",
                     "click": "", "eventName": "view:a", "eventProperties": "" }],
        "message": "Tweaked it."
    });
    let outcome = parse_refined(&raw).unwrap();
    assert_eq!(outcome.events[0].id.to_string(), "22222222-2222-2222-2222-222222222222");
    assert_eq!(outcome.message, "Tweaked it.");
}

#[test]
fn refined_mints_id_when_absent() {
    let outcome = parse_refined(&one_event_response()).unwrap();
    assert_eq!(outcome.events.len(), 1);
}

#[test]
fn refined_duplicate_supplied_ids_not_reused() {
    let raw = json!({
        "events": [
            { "id": "33333333-3333-3333-3333-333333333333", "action": "a", "view": "view:a",
              "click": "", "eventName": "view:a", "eventProperties": "" },
            { "id": "33333333-3333-3333-3333-333333333333", "action": "b", "view": "view:b",
              "click": "", "eventName": "view:b", "eventProperties": "" }
        ]
    });
    let outcome = parse_refined(&raw).unwrap();
    assert_eq!(outcome.events[0].id.to_string(), "33333333-3333-3333-3333-333333333333");
    assert_ne!(outcome.events[1].id, outcome.events[0].id);
}

#[test]
fn refined_message_fallback_when_absent() {
    let outcome = parse_refined(&one_event_response()).unwrap();
    assert_eq!(outcome.message, REFINE_FALLBACK_MESSAGE);
}

#[test]
fn refined_message_fallback_when_blank() {
    let mut raw = one_event_response();
    raw["message"] = json!("   ");
    let outcome = parse_refined(&raw).unwrap();
    assert_eq!(outcome.message, REFINE_FALLBACK_MESSAGE);
}

#[test]
fn refined_invalid_id_string_gets_fresh_id() {
    let raw = json!({
        "events": [{ "id": "not-a-uuid", "action": "a", "view": "view:a",
                     "click": "", "eventName": "view:a", "eventProperties": "" }]
    });
    let outcome = parse_refined(&raw).unwrap();
    assert_eq!(outcome.events.len(), 1);
}
