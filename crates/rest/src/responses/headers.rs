//! Response header helpers for listings.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Header carrying the total number of records in a collection.
pub static TOTAL_RECORDS: HeaderName = HeaderName::from_static("total-records");

/// Header carrying the continuation URL of a truncated listing.
pub static NEXT_PAGE: HeaderName = HeaderName::from_static("next-page");

/// Builds the headers for a collection listing: always `Total-Records`,
/// plus `Next-Page` when a continuation URL exists.
pub fn listing_headers(total: u64, next_page: Option<String>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&total.to_string()) {
        headers.insert(TOTAL_RECORDS.clone(), value);
    }
    if let Some(url) = next_page {
        if let Ok(value) = HeaderValue::from_str(&url) {
            headers.insert(NEXT_PAGE.clone(), value);
        }
    }
    headers
}
