//! Ollama `/api/generate` client.
//!
//! One non-streaming call per prompt. Pure parsing in `parse_response` for
//! testability.

use super::config::LlmTimeouts;
use super::types::{Generation, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout_secs: u64,
}

impl OllamaClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = super::build_http(timeouts)?;
        Ok(Self { http, base_url, request_timeout_secs: timeouts.request_secs })
    }

    pub async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = ApiRequest { model, prompt, stream: false };
        let text = super::post_json(&self.http, &url, None, &body, self.request_timeout_secs).await?;
        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    response: String,
    #[serde(default)]
    prompt_eval_count: u64,
    #[serde(default)]
    eval_count: u64,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<Generation, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    if api.response.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(Generation {
        text: api.response,
        model: api.model,
        prompt_tokens: api.prompt_eval_count,
        completion_tokens: api.eval_count,
    })
}

#[cfg(test)]
#[path = "ollama_test.rs"]
mod tests;
