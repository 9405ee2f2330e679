use super::*;

#[test]
fn error_message_prefers_error_field() {
    let msg = error_message(StatusCode::GATEWAY_TIMEOUT, r#"{"error":"Request timed out"}"#);
    assert_eq!(msg, "Request timed out");
}

#[test]
fn error_message_falls_back_to_body() {
    let msg = error_message(StatusCode::UNPROCESSABLE_ENTITY, "missing field `username`\n");
    assert_eq!(msg, "missing field `username`");
}

#[test]
fn error_message_empty_body_uses_reason() {
    assert_eq!(error_message(StatusCode::UNAUTHORIZED, ""), "Unauthorized");
}

#[test]
fn base_url_trailing_slash_trimmed() {
    let client = ApiClient::new("http://127.0.0.1:3000/", None);
    assert_eq!(client.url("/menu"), "http://127.0.0.1:3000/menu");
}
