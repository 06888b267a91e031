//! Shared types for storage operations: sorting, pagination tokens, pages.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PaginationError;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

/// A sort instruction for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorting {
    /// The record field to sort on.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl Sorting {
    /// Ascending sort on `field`.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on `field`.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parses a `_sort` query value: a field name, `-` prefixed for
    /// descending order.
    pub fn from_param(param: &str) -> Self {
        match param.strip_prefix('-') {
            Some(field) => Self::descending(field),
            None => Self::ascending(param),
        }
    }
}

impl Default for Sorting {
    fn default() -> Self {
        Self::descending("last_modified")
    }
}

/// An opaque cursor for keyset pagination.
///
/// The token encodes the sort key values of the last record returned on
/// the previous page, with the record id as tie-break. It is:
///
/// - request-scoped, never persisted;
/// - opaque to clients (base64url-encoded JSON);
/// - stable across concurrent insertions before the cursor position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationToken {
    /// Sort key values (and id) of the last seen record.
    last_record: Map<String, Value>,
}

impl PaginationToken {
    /// Builds a token from the last record of a page, capturing the sort
    /// field value and the record id.
    pub fn from_record(record: &Value, sorting: &Sorting) -> Self {
        let mut last_record = Map::new();
        if let Some(v) = record.get(&sorting.field) {
            last_record.insert(sorting.field.clone(), v.clone());
        }
        if let Some(id) = record.get("id") {
            last_record.insert("id".to_string(), id.clone());
        }
        Self { last_record }
    }

    /// Returns the captured value for `field`, if any.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.last_record.get(field)
    }

    /// Returns the captured record id, if any.
    pub fn id(&self) -> Option<&Value> {
        self.last_record.get("id")
    }

    /// Encodes the token to an opaque string.
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(&json)
    }

    /// Decodes a token from an opaque string.
    pub fn decode(s: &str) -> Result<Self, PaginationError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| PaginationError::InvalidToken {
                token: s.to_string(),
            })?;

        serde_json::from_slice(&bytes).map_err(|_| PaginationError::InvalidToken {
            token: s.to_string(),
        })
    }
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page {
    /// The records on this page, in sort order.
    pub records: Vec<Value>,
    /// Cursor to the next page, present only when records remain beyond
    /// this page.
    pub next_token: Option<PaginationToken>,
}

impl Page {
    /// A page holding every remaining record (no continuation).
    pub fn complete(records: Vec<Value>) -> Self {
        Self {
            records,
            next_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorting_from_param_parses_direction() {
        assert_eq!(Sorting::from_param("name"), Sorting::ascending("name"));
        assert_eq!(Sorting::from_param("-name"), Sorting::descending("name"));
    }

    #[test]
    fn token_round_trips_through_encoding() {
        let record = json!({"id": "abc", "last_modified": 1700000000123u64});
        let token = PaginationToken::from_record(&record, &Sorting::default());

        let decoded = PaginationToken::decode(&token.encode()).unwrap();
        assert_eq!(decoded.id(), Some(&json!("abc")));
        assert_eq!(
            decoded.value("last_modified"),
            Some(&json!(1700000000123u64))
        );
    }

    #[test]
    fn token_decode_rejects_garbage() {
        assert!(PaginationToken::decode("not!base64!!").is_err());
        // Valid base64, invalid JSON.
        let garbage = URL_SAFE_NO_PAD.encode(b"not json");
        assert!(PaginationToken::decode(&garbage).is_err());
    }
}
