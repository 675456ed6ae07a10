use super::*;

fn make_response(parts: serde_json::Value) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }],
        "modelVersion": "gemini-2.0-flash"
    })
    .to_string()
}

// =========================================================================
// parse_response
// =========================================================================

#[test]
fn parse_single_text_part() {
    let json = make_response(serde_json::json!([{ "text": "{\"events\": []}" }]));
    let text = parse_response(&json).unwrap();
    assert_eq!(text, "{\"events\": []}");
}

#[test]
fn parse_joins_multiple_text_parts() {
    let json = make_response(serde_json::json!([{ "text": "{\"events\":" }, { "text": " []}" }]));
    let text = parse_response(&json).unwrap();
    assert_eq!(text, "{\"events\": []}");
}

#[test]
fn parse_skips_non_text_parts() {
    let json = make_response(serde_json::json!([
        { "inlineData": { "mimeType": "image/png", "data": "AAAA" } },
        { "text": "ok" }
    ]));
    let text = parse_response(&json).unwrap();
    assert_eq!(text, "ok");
}

#[test]
fn parse_no_candidates_is_error() {
    let json = serde_json::json!({ "candidates": [] }).to_string();
    let err = parse_response(&json).unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

#[test]
fn parse_candidate_without_content_is_error() {
    let json = serde_json::json!({ "candidates": [{ "finishReason": "SAFETY" }] }).to_string();
    assert!(parse_response(&json).is_err());
}

#[test]
fn parse_empty_text_is_error() {
    let json = make_response(serde_json::json!([]));
    assert!(parse_response(&json).is_err());
}

#[test]
fn parse_invalid_json_is_error() {
    let err = parse_response("not json").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

// =========================================================================
// request serialization
// =========================================================================

#[test]
fn request_wire_shape_is_camel_case() {
    let schema = serde_json::json!({ "type": "object" });
    let body = ApiRequest {
        contents: vec![WireContent {
            role: Some("user"),
            parts: vec![
                to_wire_part(&Part::InlineImage { mime_type: "image/png".into(), data: "AAAA".into() }),
                to_wire_part(&Part::Text("describe".into())),
            ],
        }],
        system_instruction: WireContent { role: None, parts: vec![WirePart::text("system")] },
        generation_config: GenerationConfig { response_mime_type: "application/json", response_schema: &schema },
    };

    let json = serde_json::to_value(&body).unwrap();
    assert!(json.get("systemInstruction").is_some());
    assert!(json.get("generationConfig").is_some());
    assert_eq!(
        json["generationConfig"]["responseMimeType"],
        serde_json::json!("application/json")
    );
    assert_eq!(
        json["contents"][0]["parts"][0]["inlineData"]["mimeType"],
        serde_json::json!("image/png")
    );
    assert_eq!(json["contents"][0]["parts"][1]["text"], serde_json::json!("describe"));
    // System instruction carries no role field.
    assert!(json["systemInstruction"].get("role").is_none());
}
