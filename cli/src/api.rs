//! Thin JSON client for the menuchat HTTP API.

use protocol::ErrorBody;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CliError;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_owned(), token }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, CliError> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// `POST` with no request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        self.send::<(), T>(Method::POST, path, None).await
    }

    /// `GET /healthz`; only the status matters.
    pub async fn health(&self) -> Result<(), CliError> {
        let response = self.http.get(self.url("/healthz")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CliError::Server { status: status.as_u16(), message: "health check failed".to_owned() });
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, CliError> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(CliError::Server { status: status.as_u16(), message: error_message(status, &text) });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// The server's `{"error": ...}` text, or the raw body when it is not JSON.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => status.canonical_reason().unwrap_or("request failed").to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
