use super::*;

#[test]
fn timeout_user_message_is_distinct() {
    let err = LlmError::Timeout { secs: 30 };
    assert_eq!(err.user_message(), "Request timed out");
    assert!(err.to_string().contains("30s"));
}

#[test]
fn api_response_surfaces_plain_error_field() {
    let err = LlmError::ApiResponse { status: 404, body: r#"{"error":"model 'gemma3:4b' not found"}"#.into() };
    assert_eq!(err.user_message(), "Model error: model 'gemma3:4b' not found");
}

#[test]
fn api_response_surfaces_nested_error_message() {
    let err = LlmError::ApiResponse {
        status: 400,
        body: r#"{"error":{"message":"context length exceeded","type":"invalid_request_error"}}"#.into(),
    };
    assert_eq!(err.user_message(), "Model error: context length exceeded");
}

#[test]
fn api_response_without_detail_falls_back_to_status() {
    let err = LlmError::ApiResponse { status: 502, body: "<html>bad gateway</html>".into() };
    assert_eq!(err.user_message(), "Model error: upstream returned status 502");
}

#[test]
fn upstream_error_detail_ignores_blank_error() {
    assert_eq!(upstream_error_detail(r#"{"error":"   "}"#), None);
    assert_eq!(upstream_error_detail(r#"{"ok":true}"#), None);
    assert_eq!(upstream_error_detail("not json"), None);
}

#[test]
fn empty_response_message() {
    assert_eq!(LlmError::EmptyResponse.user_message(), "AI generated an empty response");
}

#[test]
fn generation_serde_round_trip() {
    let generation = Generation {
        text: "Halo!".into(),
        model: "gemma3:4b".into(),
        prompt_tokens: 12,
        completion_tokens: 3,
    };
    let json = serde_json::to_string(&generation).unwrap();
    let restored: Generation = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, generation);
}
