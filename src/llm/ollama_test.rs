use super::*;

fn make_response(response: &str) -> String {
    serde_json::json!({
        "model": "gemma3:4b",
        "created_at": "2025-05-01T10:00:00Z",
        "response": response,
        "done": true,
        "done_reason": "stop",
        "prompt_eval_count": 812,
        "eval_count": 64
    })
    .to_string()
}

#[test]
fn parse_text_response() {
    let resp = parse_response(&make_response("Halo! Ada yang bisa saya bantu?")).unwrap();
    assert_eq!(resp.text, "Halo! Ada yang bisa saya bantu?");
    assert_eq!(resp.model, "gemma3:4b");
    assert_eq!(resp.prompt_tokens, 812);
    assert_eq!(resp.completion_tokens, 64);
}

#[test]
fn parse_keeps_raw_text_untouched() {
    let raw = "<think>hmm</think>Baik! [CART_ACTION]\nADD|64f1|Iced Coffee|2\n[/CART_ACTION]";
    let resp = parse_response(&make_response(raw)).unwrap();
    assert_eq!(resp.text, raw);
}

#[test]
fn parse_missing_counters_default_to_zero() {
    let resp = parse_response(r#"{"model":"m","response":"ok"}"#).unwrap();
    assert_eq!(resp.prompt_tokens, 0);
    assert_eq!(resp.completion_tokens, 0);
}

#[test]
fn parse_blank_response_is_empty_error() {
    let err = parse_response(&make_response("  \n ")).unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[test]
fn parse_missing_response_field_is_empty_error() {
    let err = parse_response(r#"{"model":"m","done":true}"#).unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[test]
fn parse_invalid_json() {
    let err = parse_response("not json").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

#[test]
fn request_body_is_non_streaming() {
    let body = ApiRequest { model: "gemma3:4b", prompt: "Human: hi", stream: false };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "model": "gemma3:4b", "prompt": "Human: hi", "stream": false }));
}

// =========================================================================
// HTTP path against a local stub server
// =========================================================================

async fn spawn_stub() -> String {
    use axum::Json;
    use axum::http::StatusCode;
    use axum::routing::post;

    let app = axum::Router::new()
        .route(
            "/ok/api/generate",
            post(|Json(body): Json<serde_json::Value>| async move {
                let prompt = body["prompt"].as_str().unwrap_or_default().to_owned();
                assert_eq!(body["stream"], false);
                Json(serde_json::json!({ "model": "gemma3:4b", "response": format!("echo: {prompt}") }))
            }),
        )
        .route(
            "/slow/api/generate",
            post(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                Json(serde_json::json!({ "response": "too late" }))
            }),
        )
        .route(
            "/missing/api/generate",
            post(|| async {
                (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "model 'x' not found" })))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String) -> OllamaClient {
    OllamaClient::new(base_url, LlmTimeouts { request_secs: 1, connect_secs: 1 }).unwrap()
}

#[tokio::test]
async fn generate_returns_model_text() {
    let base = spawn_stub().await;
    let generation = client(format!("{base}/ok")).generate("gemma3:4b", "Human: hi").await.unwrap();
    assert_eq!(generation.text, "echo: Human: hi");
    assert_eq!(generation.model, "gemma3:4b");
}

#[tokio::test]
async fn slow_upstream_maps_to_timeout() {
    let base = spawn_stub().await;
    let err = client(format!("{base}/slow")).generate("gemma3:4b", "hi").await.unwrap_err();
    assert!(matches!(err, LlmError::Timeout { secs: 1 }));
    assert_eq!(err.user_message(), "Request timed out");
}

#[tokio::test]
async fn non_success_status_maps_to_api_response() {
    let base = spawn_stub().await;
    let err = client(format!("{base}/missing")).generate("x", "hi").await.unwrap_err();
    assert!(matches!(err, LlmError::ApiResponse { status: 404, .. }));
    assert_eq!(err.user_message(), "Model error: model 'x' not found");
}

#[tokio::test]
async fn unreachable_upstream_is_request_error() {
    let err = client("http://127.0.0.1:1".to_owned()).generate("x", "hi").await.unwrap_err();
    assert!(matches!(err, LlmError::ApiRequest(_)));
}
