//! Shared wire model for the menu consultation API.
//!
//! This crate owns the JSON representation used by both the server and the
//! `cli` client: catalog items, cart directives, chat messages, and the
//! request/response bodies of every endpoint. All error responses share the
//! single [`ErrorBody`] shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a wire enum is parsed from an unknown string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// Cart action other than `ADD` / `REMOVE`.
    #[error("invalid cart action: {0}")]
    InvalidAction(String),
    /// Message role other than `user` / `ai` / `system`.
    #[error("invalid message role: {0}")]
    InvalidRole(String),
    /// Menu category other than `food` / `drink`.
    #[error("invalid menu category: {0}")]
    InvalidCategory(String),
}

// =============================================================================
// CATALOG
// =============================================================================

/// Menu category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Drink,
}

impl Category {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Drink => "drink",
        }
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Self::Food),
            "drink" => Ok(Self::Drink),
            other => Err(ParseError::InvalidCategory(other.to_owned())),
        }
    }
}

/// A single orderable catalog entry. Read-only from the chat feature's side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Opaque catalog identifier, echoed verbatim in cart directives.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price, never negative.
    pub price: f64,
    #[serde(default)]
    pub calories: i32,
    pub category: Category,
    /// Picture URL for menu listings; not part of the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// =============================================================================
// CART DIRECTIVES
// =============================================================================

/// Cart mutation requested by the assistant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CartAction {
    Add,
    Remove,
}

impl CartAction {
    /// Directive keyword as it appears on the wire and in model output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Remove => "REMOVE",
        }
    }
}

impl FromStr for CartAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADD" => Ok(Self::Add),
            "REMOVE" => Ok(Self::Remove),
            other => Err(ParseError::InvalidAction(other.to_owned())),
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated cart instruction. Produced per request, never persisted.
///
/// `name` and `price` come from the catalog entry the id resolved to, not from
/// the model's text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartDirective {
    pub action: CartAction,
    pub item_id: String,
    pub name: String,
    pub price: f64,
    /// Always at least 1.
    pub quantity: u32,
}

// =============================================================================
// CONVERSATION
// =============================================================================

/// Author of a conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
    System,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
            Self::System => "system",
        }
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "ai" => Ok(Self::Ai),
            "system" => Ok(Self::System),
            other => Err(ParseError::InvalidRole(other.to_owned())),
        }
    }
}

/// One stored conversation turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

/// `POST /api/consult` request body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsultRequest {
    #[serde(default)]
    pub prompt: String,
}

/// `POST /api/consult` success body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsultResponse {
    /// Assistant text with reasoning spans and the directive block removed.
    pub display_text: String,
    /// Validated directives in source line order.
    pub actions: Vec<CartDirective>,
}

// =============================================================================
// ACCOUNTS
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// `GET /dashboard` body. Never carries the password hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckUsernameRequest {
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckUsernameResponse {
    pub available: bool,
}

/// Plain acknowledgement body (`register`, `logout`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Error payload returned by every failing endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
