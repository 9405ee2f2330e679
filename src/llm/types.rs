//! LLM types: provider-neutral generation result, errors, and the
//! [`LlmGenerate`] trait that the consult pipeline depends on.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// `LLM_API_KEY_ENV` names a variable that is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the inference endpoint failed before a response.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The call exceeded its deadline and was cancelled.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The inference endpoint returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The model answered with no text at all.
    #[error("AI generated an empty response")]
    EmptyResponse,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// Human-readable message for the chat client.
    ///
    /// Non-success responses surface the provider's own `error` text when the
    /// body carries one (`{"error": "..."}` or `{"error": {"message": "..."}}`).
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout { .. } => "Request timed out".to_owned(),
            Self::ApiResponse { status, body } => match upstream_error_detail(body) {
                Some(detail) => format!("Model error: {detail}"),
                None => format!("Model error: upstream returned status {status}"),
            },
            other => other.to_string(),
        }
    }
}

/// Extract the `error` text from a provider error payload, if any.
pub(crate) fn upstream_error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    let text = error
        .as_str()
        .or_else(|| error.get("message").and_then(serde_json::Value::as_str))?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

// =============================================================================
// GENERATION
// =============================================================================

/// Result of a single non-streaming completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// Raw model output, unmodified.
    pub text: String,
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

// =============================================================================
// LLM GENERATE TRAIT
// =============================================================================

/// Provider-neutral async trait for single-prompt completion. Enables mocking
/// in tests.
#[async_trait::async_trait]
pub trait LlmGenerate: Send + Sync {
    /// Send one prompt and wait for the full (non-streamed) completion.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or times out, the provider
    /// answers with a non-success status, or the body is malformed or empty.
    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
