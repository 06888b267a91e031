//! Error types for the storage layer.
//!
//! This module defines all error types used throughout the storage layer,
//! separating record-state errors, unicity violations, and opaque backend
//! failures. The REST layer maps each category to its own HTTP behavior,
//! so the distinction here is load-bearing: a [`UnicityError`] carries the
//! conflicting record back to the caller, while a [`BackendError`] hides
//! its cause from clients entirely.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use serde_json::Value;
use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record state errors (not found).
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A declared unique field would be duplicated.
    #[error(transparent)]
    Unicity(#[from] UnicityError),

    /// Invalid pagination token supplied by the client.
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    /// Backend-specific errors (connection lost, corrupted state, ...).
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to record state.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The requested record was not found in the collection.
    #[error("record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },
}

/// A record would violate a declared field unicity constraint.
///
/// Carries the field at fault and the existing record that already
/// satisfies the constraint, so the resource layer can either surrender
/// the existing record (idempotent create) or report the conflict.
#[derive(Error, Debug)]
#[error("unicity constraint violated on field {field}")]
pub struct UnicityError {
    /// The unique field holding the duplicated value.
    pub field: String,
    /// The existing record holding that value. Contains at minimum the
    /// record id.
    pub existing: Value,
}

impl UnicityError {
    /// Creates a unicity error for `field`, conflicting with `existing`.
    pub fn new(field: impl Into<String>, existing: Value) -> Self {
        Self {
            field: field.into(),
            existing,
        }
    }

    /// Returns the id of the conflicting record, if it carries one.
    pub fn existing_id(&self) -> Option<&Value> {
        self.existing.get("id")
    }
}

/// Errors related to pagination tokens.
#[derive(Error, Debug)]
pub enum PaginationError {
    /// The pagination token could not be decoded.
    #[error("invalid pagination token: {token}")]
    InvalidToken { token: String },
}

/// An unexpected failure from the storage backend.
///
/// The original cause is preserved for diagnostics but is never shown to
/// clients; the REST layer logs it and serves an opaque 503.
#[derive(Error, Debug)]
#[error("storage backend failure")]
pub struct BackendError {
    #[source]
    source: anyhow::Error,
}

impl BackendError {
    /// Wraps the original failure.
    pub fn new(source: impl Into<anyhow::Error>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Returns the original underlying error for logging.
    pub fn cause(&self) -> &anyhow::Error {
        &self.source
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
