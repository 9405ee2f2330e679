//! OpenAI-compatible `/completions` client.
//!
//! Targets self-hosted servers that speak the legacy text-completions API
//! (llama.cpp server, vLLM, LM Studio). The composed prompt already carries
//! the whole transcript, so the prompt-in/text-out endpoint fits better than
//! `/chat/completions`.

use super::config::LlmTimeouts;
use super::types::{Generation, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    max_tokens: u32,
    request_timeout_secs: u64,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        max_tokens: u32,
        timeouts: LlmTimeouts,
    ) -> Result<Self, LlmError> {
        let http = super::build_http(timeouts)?;
        Ok(Self { http, base_url, api_key, max_tokens, request_timeout_secs: timeouts.request_secs })
    }

    pub async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, LlmError> {
        let url = format!("{}/completions", self.base_url);
        let body = CompletionRequest { model, prompt, max_tokens: self.max_tokens, stream: false };
        let text = super::post_json(
            &self.http,
            &url,
            self.api_key.as_deref(),
            &body,
            self.request_timeout_secs,
        )
        .await?;
        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    stream: bool,
}

#[derive(serde::Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(serde::Deserialize)]
struct Choice {
    #[serde(default)]
    text: String,
}

#[derive(serde::Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<Generation, LlmError> {
    let api: CompletionResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let text = api
        .choices
        .into_iter()
        .next()
        .map(|c| c.text)
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let (prompt_tokens, completion_tokens) = api
        .usage
        .map_or((0, 0), |u| (u.prompt_tokens, u.completion_tokens));

    Ok(Generation { text, model: api.model, prompt_tokens, completion_tokens })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
