//! Record payload extractors.
//!
//! Requests carrying a record wrap it in a `data` member:
//!
//! ```json
//! {"data": {"name": "Champignon"}}
//! ```
//!
//! Extraction turns the body into an explicit parse result consumed by
//! the error translator. Failures accumulate details in discovery order:
//! a body that fails to parse yields a structural detail first, then the
//! implied `data is missing` detail, since an unparseable body cannot
//! carry the main payload.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Value, json};

use crate::error::{ErrorDetail, Location, RestError};

/// The record payload of a create/replace request.
///
/// Rejects empty bodies, unparseable bodies, and bodies without a `data`
/// member.
#[derive(Debug)]
pub struct Payload(pub Value);

/// The record payload of a modify request.
///
/// An empty body is rejected ("Empty body"); a parseable body without a
/// `data` member yields an empty patch.
#[derive(Debug)]
pub struct PatchPayload(pub Value);

/// Parses the body and pulls out the `data` member.
///
/// `data_required` distinguishes create/replace (member required) from
/// modify (member defaults to an empty object).
fn extract_data(bytes: &Bytes, data_required: bool) -> Result<Value, RestError> {
    if bytes.is_empty() {
        if data_required {
            return Err(RestError::invalid(ErrorDetail::data_missing()));
        }
        return Err(RestError::invalid(ErrorDetail::structural(
            Location::Body,
            "Empty body",
        )));
    }

    let body: Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(err) => {
            // Parse error first, then the missing payload it implies.
            return Err(RestError::Invalid {
                details: vec![
                    ErrorDetail::structural(
                        Location::Body,
                        format!("Invalid JSON request body: {}", err),
                    ),
                    ErrorDetail::data_missing(),
                ],
            });
        }
    };

    match body.get("data") {
        Some(data) if data.is_object() => Ok(data.clone()),
        Some(_) => Err(RestError::invalid(ErrorDetail::named(
            Location::Body,
            "data",
            "data is not an object",
        ))),
        None if data_required => Err(RestError::invalid(ErrorDetail::data_missing())),
        None => Ok(json!({})),
    }
}

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|err| {
            RestError::invalid(ErrorDetail::structural(Location::Body, err.to_string()))
        })?;
        extract_data(&bytes, true).map(Payload)
    }
}

impl<S> FromRequest<S> for PatchPayload
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|err| {
            RestError::invalid(ErrorDetail::structural(Location::Body, err.to_string()))
        })?;
        extract_data(&bytes, false).map(PatchPayload)
    }
}
