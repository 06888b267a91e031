//! Error types for the REST resource layer.
//!
//! This module is the error envelope translator: it converts internal
//! failures (payload validation, storage conflicts, backend outages,
//! missing credentials) into the canonical JSON error envelope with a
//! stable numeric error code.
//!
//! # Envelope shape
//!
//! ```json
//! {
//!     "code": 400,
//!     "errno": 107,
//!     "error": "Invalid parameters",
//!     "message": "data.name in body: 42 is not a string",
//!     "details": [
//!         {"description": "42 is not a string", "location": "body", "name": "data.name"}
//!     ]
//! }
//! ```
//!
//! `code` always matches the HTTP status line. `details` is an ordered
//! array of [`ErrorDetail`] for validation failures (discovery order:
//! structural errors first, then missing fields, then per-field errors),
//! or a `{field, existing}` object for unicity conflicts.
//!
//! # Failure mapping
//!
//! | Failure | HTTP Status | errno |
//! |---------|-------------|-------|
//! | Payload validation | 400 | 107 |
//! | Missing credentials | 401 | 104 |
//! | Invalid credentials | 401 | 105 |
//! | Unknown record | 404 | 110 |
//! | Unicity conflict (replace/modify) | 409 | 122 |
//! | Backend failure | 503 | 201 |
//!
//! A unicity conflict during *create* is not an error: the handler
//! returns 200 with the existing record (idempotent create), so it never
//! reaches this translator.
//!
//! Backend failures are logged once at ERROR level with the original
//! cause attached; the client-facing body carries no internal detail.

use std::fmt;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use tracing::error;

use cabinet_storage::{BackendError, RecordError, StorageError, UnicityError};

/// Stable numeric error codes carried in the `errno` envelope field.
///
/// These values are part of the public API contract and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Errno {
    /// No authentication token was provided.
    MissingAuthToken = 104,
    /// The provided authentication token is malformed or rejected.
    InvalidAuthToken = 105,
    /// The request body is not valid JSON.
    BadJson = 106,
    /// A request parameter failed validation.
    InvalidParameters = 107,
    /// A required parameter is missing.
    MissingParameters = 108,
    /// The posted data is semantically invalid.
    InvalidPostedData = 109,
    /// The requested resource does not exist.
    MissingResource = 110,
    /// A declared unicity constraint was violated.
    ConstraintViolated = 122,
    /// The storage backend failed.
    Backend = 201,
    /// Unclassified error.
    Undefined = 999,
}

impl Serialize for Errno {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(*self as u16)
    }
}

/// Where in the request a validation failure was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// The request body.
    Body,
    /// The query string.
    Querystring,
    /// The URL path.
    Path,
    /// A request header.
    Header,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Body => write!(f, "body"),
            Location::Querystring => write!(f, "querystring"),
            Location::Path => write!(f, "path"),
            Location::Header => write!(f, "header"),
        }
    }
}

/// One field-level or structural validation failure.
///
/// `name` serializes as JSON `null` for structural failures that do not
/// point at a named field (e.g. an unparseable body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    /// Human-readable description of the failure.
    pub description: String,
    /// Where the failure was located.
    pub location: Location,
    /// The field at fault, dotted path from the payload root.
    pub name: Option<String>,
}

impl ErrorDetail {
    /// A failure on a named field.
    pub fn named(
        location: Location,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            location,
            name: Some(name.into()),
        }
    }

    /// A structural failure with no named field.
    pub fn structural(location: Location, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            location,
            name: None,
        }
    }

    /// The conventional detail reported when the main payload is absent.
    pub fn data_missing() -> Self {
        Self::named(Location::Body, "data", "data is missing")
    }

    /// The envelope `message` derived from this detail.
    ///
    /// When the field name already appears in the description, the
    /// description stands alone ("data is missing"); otherwise the name
    /// and location prefix it ("data.name in body: 42 is not a string").
    fn message(&self) -> String {
        match &self.name {
            Some(name) if self.description.contains(name.as_str()) => self.description.clone(),
            Some(name) => format!("{} in {}: {}", name, self.location, self.description),
            None => format!("{}: {}", self.location, self.description),
        }
    }
}

/// The canonical JSON error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// HTTP status code, always matching the status line.
    pub code: u16,
    /// Stable numeric error code.
    pub errno: Errno,
    /// Short name of the error class.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Structured details: an ordered array for validation failures, a
    /// `{field, existing}` object for conflicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// The primary error type for REST resource operations.
#[derive(Debug)]
pub enum RestError {
    /// Request validation failed (HTTP 400). Details are in discovery
    /// order.
    Invalid {
        /// The validation failures, ordered.
        details: Vec<ErrorDetail>,
    },

    /// No credentials were provided (HTTP 401).
    Unauthenticated,

    /// Credentials were provided but are malformed (HTTP 401).
    InvalidCredentials,

    /// Record or collection not found (HTTP 404).
    NotFound {
        /// The collection name.
        collection: String,
        /// The record id, absent for unknown collections.
        id: Option<String>,
    },

    /// Unicity conflict on replace/modify (HTTP 409).
    Conflict {
        /// The unique field holding the duplicated value.
        field: String,
        /// The conflicting existing record.
        existing: Value,
    },

    /// Opaque storage failure (HTTP 503). The cause is logged, never
    /// exposed.
    Backend(BackendError),
}

impl RestError {
    /// A validation error with a single detail.
    pub fn invalid(detail: ErrorDetail) -> Self {
        RestError::Invalid {
            details: vec![detail],
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::Invalid { details } => match details.first() {
                Some(detail) => write!(f, "invalid request: {}", detail.message()),
                None => write!(f, "invalid request"),
            },
            RestError::Unauthenticated => write!(f, "no authentication token provided"),
            RestError::InvalidCredentials => write!(f, "invalid authentication token"),
            RestError::NotFound { collection, id } => match id {
                Some(id) => write!(f, "record not found: {}/{}", collection, id),
                None => write!(f, "unknown collection: {}", collection),
            },
            RestError::Conflict { field, existing } => {
                write!(
                    f,
                    "Conflict of field {} on record {}",
                    field,
                    record_id_display(existing)
                )
            }
            RestError::Backend(_) => write!(f, "storage backend failure"),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        match self {
            RestError::Invalid { details } => {
                let message = details
                    .first()
                    .map(|d| d.message())
                    .unwrap_or_else(|| "invalid request".to_string());
                let body = ErrorResponse {
                    code: 400,
                    errno: Errno::InvalidParameters,
                    error: "Invalid parameters".to_string(),
                    message,
                    details: Some(json!(details)),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }

            RestError::Unauthenticated | RestError::InvalidCredentials => {
                let errno = match self {
                    RestError::Unauthenticated => Errno::MissingAuthToken,
                    _ => Errno::InvalidAuthToken,
                };
                let body = ErrorResponse {
                    code: 401,
                    errno,
                    error: "Unauthorized".to_string(),
                    message: "Please authenticate yourself to use this endpoint.".to_string(),
                    details: None,
                };
                let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Basic realm=\"Cabinet\""),
                );
                response
            }

            RestError::NotFound { collection, id } => {
                let message = match id {
                    Some(id) => format!("{}/{} was not found", collection, id),
                    None => format!("collection {} was not found", collection),
                };
                let body = ErrorResponse {
                    code: 404,
                    errno: Errno::MissingResource,
                    error: "Not Found".to_string(),
                    message,
                    details: None,
                };
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }

            RestError::Conflict { field, existing } => {
                let message = format!(
                    "Conflict of field {} on record {}",
                    field,
                    record_id_display(&existing)
                );
                let body = ErrorResponse {
                    code: 409,
                    errno: Errno::ConstraintViolated,
                    error: "Conflict".to_string(),
                    message,
                    details: Some(json!({
                        "field": field,
                        "existing": existing,
                    })),
                };
                (StatusCode::CONFLICT, Json(body)).into_response()
            }

            RestError::Backend(err) => {
                // The one place the original cause surfaces. The client
                // body stays opaque.
                error!(cause = ?err.cause(), "Storage backend failure");
                let body = ErrorResponse {
                    code: 503,
                    errno: Errno::Backend,
                    error: "Service Unavailable".to_string(),
                    message:
                        "Service temporary unavailable due to overloading or maintenance, please \
                         retry later."
                            .to_string(),
                    details: None,
                };
                let mut response = (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from_static("30"));
                response
            }
        }
    }
}

/// The record id as it appears in conflict messages: string ids
/// unquoted, anything else in its JSON form.
fn record_id_display(existing: &Value) -> String {
    match existing.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Record(RecordError::NotFound { collection, id }) => RestError::NotFound {
                collection,
                id: Some(id),
            },
            StorageError::Unicity(UnicityError { field, existing }) => {
                RestError::Conflict { field, existing }
            }
            StorageError::Pagination(err) => RestError::invalid(ErrorDetail::named(
                Location::Querystring,
                "_token",
                err.to_string(),
            )),
            StorageError::Backend(err) => RestError::Backend(err),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
