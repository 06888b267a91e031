//! Axum middleware for the Cabinet REST API.

pub mod auth;

pub use auth::{Principal, require_authentication};
