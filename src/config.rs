//! Server configuration parsed from environment variables.
//!
//! A `.env` file in the working directory is loaded by `main` before any of
//! these readers run; real environment variables take precedence over it.

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_JWT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Top-level server settings. LLM settings live in [`crate::llm::config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_secs: u64,
}

impl ServerConfig {
    /// Required: `DATABASE_URL`, `JWT_SECRET`.
    /// Optional: `PORT` (3000), `JWT_TTL_SECS` (7 days).
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or `PORT` is not a
    /// valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };
        let jwt_ttl_secs = parse_or(lookup("JWT_TTL_SECS"), DEFAULT_JWT_TTL_SECS);

        Ok(Self { database_url, port, jwt_secret, jwt_ttl_secs })
    }
}

/// Parse an optional raw value, returning `default` when absent or unparseable.
pub(crate) fn parse_or<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Parse `key` as `T`, returning `default` when unset or unparseable.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    parse_or(std::env::var(key).ok(), default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
