//! Modify interaction handler.
//!
//! `PATCH /{collection}/{id}` merges the provided fields into the
//! existing record. Only provided fields are validated; an empty body is
//! rejected with a 400 "Empty body" envelope by the payload extractor.
//!
//! # Response
//!
//! - `200 OK` - record modified, body is `{"data": record}`
//! - `400 Bad Request` - empty body or field validation failure
//! - `404 Not Found` - no such record
//! - `409 Conflict` - a unicity constraint holds for another record
//! - `503 Service Unavailable` - storage backend failure

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use cabinet_storage::RecordStorage;

use crate::error::{RestError, RestResult};
use crate::extractors::PatchPayload;
use crate::handlers::strip_server_fields;
use crate::state::AppState;

/// Handler for the modify interaction.
pub async fn patch_handler<S>(
    State(state): State<AppState<S>>,
    Path((collection, id)): Path<(String, String)>,
    PatchPayload(mut data): PatchPayload,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let resource = state.resource(&collection)?;

    strip_server_fields(&mut data);
    let details = resource.record_schema().validate_partial(&data);
    if !details.is_empty() {
        return Err(RestError::Invalid { details });
    }

    // Merge into the current record; 404 when it doesn't exist.
    // Read-modify-write across two storage calls: a record deleted
    // between them is re-created by the upsert. Single-writer
    // last-write-wins semantics; a backend needing stronger guarantees
    // must serialize at its own level.
    let mut merged = state.storage().get(&collection, &id).await?;
    if let (Some(target), Some(changes)) = (merged.as_object_mut(), data.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }

    let record = state
        .storage()
        .update(&collection, &id, merged, resource.unique_fields())
        .await?;

    debug!(collection = %collection, id = %id, "Record modified");
    Ok(Json(json!({"data": record})).into_response())
}
