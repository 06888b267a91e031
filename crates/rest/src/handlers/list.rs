//! List interaction handler.
//!
//! `GET /{collection}` returns `{"data": [records]}` in sort order.
//!
//! # Query parameters
//!
//! - `_limit` - page size (capped by the server's maximum)
//! - `_sort` - sort field, `-` prefixed for descending; defaults to
//!   most-recent-first (`-last_modified`)
//! - `_token` - continuation cursor from a previous page
//!
//! # Response headers
//!
//! - `Total-Records` - number of records in the collection
//! - `Next-Page` - absolute continuation URL, only when the page was
//!   truncated

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use cabinet_storage::{PaginationToken, RecordStorage, Sorting};

use crate::error::{ErrorDetail, Location, RestError, RestResult};
use crate::responses::headers::listing_headers;
use crate::responses::next_page_url;
use crate::state::AppState;

/// Handler for the list interaction.
pub async fn list_handler<S>(
    State(state): State<AppState<S>>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    state.resource(&collection)?;

    let limit = parse_limit(&params)?;
    let limit = state.config().effective_limit(limit);

    let sorting = params
        .get("_sort")
        .map(|s| Sorting::from_param(s))
        .unwrap_or_default();

    let token = params
        .get("_token")
        .map(|t| {
            PaginationToken::decode(t).map_err(|err| {
                RestError::invalid(ErrorDetail::named(
                    Location::Querystring,
                    "_token",
                    err.to_string(),
                ))
            })
        })
        .transpose()?;

    let page = state
        .storage()
        .list(&collection, &sorting, token.as_ref(), limit)
        .await?;
    let total = state.storage().count(&collection).await?;

    let next_page = page
        .next_token
        .as_ref()
        .map(|token| next_page_url(&headers, &uri, token));

    debug!(
        collection = %collection,
        returned = page.records.len(),
        total = total,
        truncated = next_page.is_some(),
        "Listing served"
    );

    let response_headers = listing_headers(total, next_page);
    Ok((response_headers, Json(json!({"data": page.records}))).into_response())
}

/// Parses `_limit`; a non-numeric or zero value is a querystring
/// validation error. A zero limit would serve an empty page with no
/// continuation cursor, stalling the listing.
fn parse_limit(params: &HashMap<String, String>) -> RestResult<Option<usize>> {
    match params.get("_limit") {
        None => Ok(None),
        Some(raw) => match raw.parse::<usize>() {
            Ok(0) | Err(_) => Err(RestError::invalid(ErrorDetail::named(
                Location::Querystring,
                "_limit",
                format!("{} is not a positive integer", raw),
            ))),
            Ok(limit) => Ok(Some(limit)),
        },
    }
}
