//! Account service: registration, password login, and bearer tokens.
//!
//! DESIGN
//! ======
//! Passwords are stored as bcrypt hashes. A successful login returns an
//! HS256 JWT whose `sub` is the user id; every authenticated route verifies
//! it statelessly, so "logout" only clears server-side chat data and the
//! client drops its token.
//!
//! Duplicate usernames and emails are caught twice: an explicit lookup for
//! the friendly error, and the table's unique constraints for the race.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use protocol::RegisterRequest;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;
const BCRYPT_COST: u32 = 10;

const USERNAME_CONSTRAINT: &str = "users_username_key";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("email already exists")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed: {0}")]
    HashTask(#[from] tokio::task::JoinError),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

impl AuthError {
    /// Errors the caller caused, as opposed to server faults.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_)
                | Self::PasswordTooShort
                | Self::UsernameTaken
                | Self::EmailTaken
                | Self::InvalidCredentials
        )
    }
}

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl UserRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> Self {
        Self {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
        }
    }
}

// =============================================================================
// TOKENS
// =============================================================================

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    /// The user id carried in `sub`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` if `sub` is not a UUID.
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidCredentials)
    }
}

/// Signing and verification keys derived from `JWT_SECRET`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl JwtKeys {
    #[must_use]
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for `user_id`, valid for the configured TTL from now.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        self.issue_at(user_id, jsonwebtoken::get_current_timestamp())
    }

    /// Issue a token as if the current time were `iat` (seconds).
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn issue_at(&self, user_id: Uuid, iat: u64) -> Result<String, AuthError> {
        let claims = Claims { sub: user_id.to_string(), iat, exp: iat.saturating_add(self.ttl_secs) };
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Check signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` for a malformed, forged, or expired token.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

// =============================================================================
// PASSWORDS
// =============================================================================

// bcrypt is CPU-bound; both helpers run on the blocking pool.

/// # Errors
///
/// Returns an error if bcrypt fails or the blocking task is lost.
pub async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST)).await??;
    Ok(hash)
}

/// A malformed stored hash counts as a mismatch.
///
/// # Errors
///
/// Returns an error only if the blocking task is lost.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let (password, hash) = (password.to_owned(), hash.to_owned());
    let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false)).await?;
    Ok(matched)
}

/// Field presence and password length, checked before touching the database.
///
/// # Errors
///
/// Returns `MissingField` or `PasswordTooShort`.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), AuthError> {
    if req.username.trim().is_empty() {
        return Err(AuthError::MissingField("username"));
    }
    if req.email.trim().is_empty() {
        return Err(AuthError::MissingField("email"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

// =============================================================================
// QUERIES
// =============================================================================

/// Insert a user with an already-hashed password.
///
/// # Errors
///
/// Returns `UsernameTaken` / `EmailTaken` on a unique violation, or a
/// database error.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<UserRow, AuthError> {
    let row = sqlx::query(
        r"INSERT INTO users (username, email, password_hash)
          VALUES ($1, $2, $3)
          RETURNING id, username, email, password_hash",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)?;

    Ok(UserRow::from_row(&row))
}

fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return if db.constraint() == Some(USERNAME_CONSTRAINT) {
                AuthError::UsernameTaken
            } else {
                AuthError::EmailTaken
            };
        }
    }
    AuthError::Db(err)
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query("SELECT id, username, email, password_hash FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(UserRow::from_row))
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query("SELECT id, username, email, password_hash FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(UserRow::from_row))
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn username_available(pool: &PgPool, username: &str) -> Result<bool, AuthError> {
    Ok(find_by_username(pool, username.trim()).await?.is_none())
}

// =============================================================================
// FLOWS
// =============================================================================

/// Validate, hash, and store a new account.
///
/// # Errors
///
/// Returns a client error for invalid input or a taken username/email.
pub async fn register(pool: &PgPool, req: &RegisterRequest) -> Result<UserRow, AuthError> {
    validate_registration(req)?;
    let username = req.username.trim();
    if find_by_username(pool, username).await?.is_some() {
        return Err(AuthError::UsernameTaken);
    }

    let password_hash = hash_password(&req.password).await?;
    let user = create_user(pool, username, req.email.trim(), &password_hash).await?;
    info!(user_id = %user.id, username = %user.username, "auth: user registered");
    Ok(user)
}

/// Check credentials and issue a token.
///
/// # Errors
///
/// Returns `InvalidCredentials` for an unknown user or wrong password.
pub async fn login(pool: &PgPool, keys: &JwtKeys, username: &str, password: &str) -> Result<(UserRow, String), AuthError> {
    let user = find_by_username(pool, username.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;
    if !verify_password(password, &user.password_hash).await? {
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys.issue(user.id)?;
    info!(user_id = %user.id, "auth: login");
    Ok((user, token))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
