//! Basic authentication middleware.
//!
//! Every resource route requires an `Authorization: Basic` header. The
//! default policy accepts any well-formed credentials and derives the
//! principal from the username; credential verification against a user
//! store is a deployment concern plugged in behind this middleware.
//!
//! Missing credentials and malformed credentials are distinguished in
//! the error envelope (errno 104 vs 105); both are served as an opaque
//! 401 before any handler or storage call runs.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::debug;

use crate::error::RestError;

/// The authenticated principal, attached to the request extensions.
#[derive(Debug, Clone)]
pub struct Principal(pub String);

/// Parses an `Authorization: Basic` header value into a principal.
fn parse_basic(value: &str) -> Result<Principal, RestError> {
    let encoded = value
        .strip_prefix("Basic ")
        .ok_or(RestError::InvalidCredentials)?;
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| RestError::InvalidCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| RestError::InvalidCredentials)?;

    let (user, _password) = decoded
        .split_once(':')
        .ok_or(RestError::InvalidCredentials)?;
    if user.is_empty() {
        return Err(RestError::InvalidCredentials);
    }
    Ok(Principal(user.to_string()))
}

/// Middleware enforcing Basic authentication.
///
/// Use with `axum::middleware::from_fn`.
pub async fn require_authentication(mut request: Request, next: Next) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let principal = match header_value {
        None => return RestError::Unauthenticated.into_response(),
        Some(value) => match parse_basic(value) {
            Ok(principal) => principal,
            Err(err) => return err.into_response(),
        },
    };

    debug!(principal = %principal.0, "Authenticated request");
    request.extensions_mut().insert(principal);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_credentials_yield_the_username() {
        // "mat:1"
        let principal = parse_basic("Basic bWF0OjE=").unwrap();
        assert_eq!(principal.0, "mat");
    }

    #[test]
    fn non_basic_scheme_is_rejected() {
        assert!(matches!(
            parse_basic("Bearer abc"),
            Err(RestError::InvalidCredentials)
        ));
    }

    #[test]
    fn undecodable_credentials_are_rejected() {
        assert!(parse_basic("Basic !!!").is_err());
        // Decodes, but has no colon separator.
        let no_colon = STANDARD.encode(b"justauser");
        assert!(parse_basic(&format!("Basic {}", no_colon)).is_err());
    }
}
