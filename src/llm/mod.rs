//! LLM: adapter for the locally hosted model behind the consultation chat.
//!
//! DESIGN
//! ======
//! The `LlmClient` dispatches to Ollama (`/api/generate`) or an
//! OpenAI-compatible `/completions` server based on `LLM_PROVIDER`. Both are
//! called once per chat turn, non-streaming, with a hard request deadline;
//! no connection outlives the call.

pub mod config;
pub mod ollama;
pub mod openai;
pub mod types;

use std::time::Duration;

use serde::Serialize;

use config::{LlmConfig, LlmProviderKind, LlmTimeouts};
pub use types::LlmGenerate;
use types::{Generation, LlmError};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client that dispatches to the configured provider.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: LlmProvider,
    model: String,
}

enum LlmProvider {
    Ollama(ollama::OllamaClient),
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables (see [`LlmConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let model = config.model.clone();
        let inner = match config.provider {
            LlmProviderKind::Ollama => LlmProvider::Ollama(ollama::OllamaClient::new(config.base_url, config.timeouts)?),
            LlmProviderKind::OpenAi => LlmProvider::OpenAi(openai::OpenAiClient::new(
                config.base_url,
                config.api_key,
                config.max_tokens,
                config.timeouts,
            )?),
        };
        Ok(Self { inner, model })
    }

    /// Return the configured model id (e.g. `"gemma3:4b"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmGenerate for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError> {
        match &self.inner {
            LlmProvider::Ollama(c) => c.generate(&self.model, prompt).await,
            LlmProvider::OpenAi(c) => c.generate(&self.model, prompt).await,
        }
    }
}

// =============================================================================
// SHARED HTTP
// =============================================================================

fn build_http(timeouts: LlmTimeouts) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
        .map_err(|e| LlmError::HttpClientBuild(e.to_string()))
}

/// POST a JSON body and return the raw response text of a 2xx answer.
async fn post_json(
    http: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    body: &impl Serialize,
    timeout_secs: u64,
) -> Result<String, LlmError> {
    let mut request = http.post(url).json(body);
    if let Some(key) = bearer {
        request = request.bearer_auth(key);
    }

    let response = request
        .send()
        .await
        .map_err(|e| request_error(&e, timeout_secs))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| request_error(&e, timeout_secs))?;

    if !status.is_success() {
        return Err(LlmError::ApiResponse { status: status.as_u16(), body: text });
    }
    Ok(text)
}

fn request_error(e: &reqwest::Error, timeout_secs: u64) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout { secs: timeout_secs }
    } else {
        LlmError::ApiRequest(e.to_string())
    }
}
