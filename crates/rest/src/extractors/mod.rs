//! Axum extractors for record payloads.

pub mod payload;

pub use payload::{PatchPayload, Payload};
