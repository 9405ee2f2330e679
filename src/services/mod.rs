//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence so route handlers stay
//! focused on extraction, auth plumbing, and status mapping. `prompt` and
//! `directive` are pure; the rest talk to Postgres.

pub mod auth;
pub mod catalog;
pub mod consult;
pub mod conversation;
pub mod directive;
pub mod prompt;
