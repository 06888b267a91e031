//! `Next-Page` URL construction for truncated listings.
//!
//! The continuation URL is absolute, and its scheme and authority derive
//! from the inbound request context rather than static configuration:
//! a request arriving via `localhost:8000` yields a `Next-Page` URL
//! containing `:8000`, while the canonical port for the scheme (80 for
//! http, 443 for https) is omitted. Reverse-proxy forwarding headers
//! (`X-Forwarded-Proto`) are honored, and an explicit `Host` header that
//! embeds a scheme is used verbatim.

use axum::http::{HeaderMap, Uri, header};
use url::form_urlencoded;

use cabinet_storage::PaginationToken;

/// Query parameter carrying the pagination cursor.
pub const TOKEN_PARAM: &str = "_token";

/// Builds the absolute URL of the next page for a truncated listing.
///
/// All original query parameters are preserved; only the cursor
/// parameter is replaced.
pub fn next_page_url(headers: &HeaderMap, uri: &Uri, token: &PaginationToken) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(original) = uri.query() {
        for (key, value) in form_urlencoded::parse(original.as_bytes()) {
            if key != TOKEN_PARAM {
                query.append_pair(&key, &value);
            }
        }
    }
    query.append_pair(TOKEN_PARAM, &token.encode());

    format!("{}{}?{}", request_base(headers), uri.path(), query.finish())
}

/// Derives `scheme://authority` from the request headers.
///
/// Precedence:
/// 1. An explicit `Host` header embedding a scheme is used verbatim.
/// 2. Otherwise the scheme comes from `X-Forwarded-Proto` (defaulting to
///    `http`), and the `Host` authority has the scheme's canonical port
///    stripped.
pub fn request_base(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    if host.contains("://") {
        return host.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");

    format!("{}://{}", scheme, strip_canonical_port(host, scheme))
}

/// Strips `:80` for http and `:443` for https; any other port stays.
fn strip_canonical_port<'a>(authority: &'a str, scheme: &str) -> &'a str {
    let canonical = match scheme {
        "https" => ":443",
        _ => ":80",
    };
    authority.strip_suffix(canonical).unwrap_or(authority)
}
