use super::*;

fn api(e: ConsultError) -> ApiError {
    ApiError::from(e)
}

#[test]
fn empty_prompt_is_bad_request() {
    let err = api(ConsultError::EmptyPrompt);
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Prompt is required");
}

#[test]
fn missing_model_is_unavailable() {
    assert_eq!(api(ConsultError::LlmNotConfigured).status, StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn timeout_is_gateway_timeout() {
    let err = api(ConsultError::Upstream(LlmError::Timeout { secs: 30 }));
    assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(err.message, "Request timed out");
}

#[test]
fn upstream_status_carries_provider_detail() {
    let err = api(ConsultError::Upstream(LlmError::ApiResponse {
        status: 404,
        body: r#"{"error":"model 'gemma3:4b' not found"}"#.into(),
    }));
    assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    assert_eq!(err.message, "Model error: model 'gemma3:4b' not found");
}

#[test]
fn upstream_status_without_detail() {
    let err = api(ConsultError::Upstream(LlmError::ApiResponse { status: 500, body: "oops".into() }));
    assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    assert_eq!(err.message, "Model error: upstream returned status 500");
}

#[test]
fn empty_model_body_is_bad_gateway() {
    let err = api(ConsultError::Upstream(LlmError::EmptyResponse));
    assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    assert_eq!(err.message, "AI generated an empty response");
}

#[test]
fn persistence_failure_is_localized() {
    let err = api(ConsultError::Persistence(sqlx::Error::PoolTimedOut));
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message, PERSISTENCE_FAILURE_MESSAGE);
}
