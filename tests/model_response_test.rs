use serde_json::json;

use folio::domain::ModelResponse;

#[test]
fn given_plain_text_when_parsing_completion_then_returns_text() {
    let response = ModelResponse::from_completion("  The total is $42.  ");

    assert_eq!(response, ModelResponse::Text("The total is $42.".to_string()));
}

#[test]
fn given_json_object_when_parsing_completion_then_returns_structured() {
    let response = ModelResponse::from_completion(r#"{"total": 42}"#);

    assert_eq!(response, ModelResponse::Structured(json!({"total": 42})));
}

#[test]
fn given_fenced_json_when_parsing_completion_then_strips_fence() {
    let response = ModelResponse::from_completion("```json\n[{\"name\": \"Ada\"}]\n```");

    assert_eq!(response, ModelResponse::Structured(json!([{"name": "Ada"}])));
}

#[test]
fn given_json_scalar_when_parsing_completion_then_keeps_text() {
    let response = ModelResponse::from_completion("42");

    assert_eq!(response, ModelResponse::Text("42".to_string()));
}

#[test]
fn given_structured_response_when_rendering_then_pretty_prints() {
    let response = ModelResponse::Structured(json!({"a": 1}));

    assert_eq!(response.render(), "{\n  \"a\": 1\n}");
    assert!(response.is_structured());
}
