//! Replace interaction handler.
//!
//! `PUT /{collection}/{id}` replaces the whole record (creating it if
//! absent), with full schema validation.
//!
//! # Response
//!
//! - `200 OK` - record replaced, body is `{"data": record}`
//! - `400 Bad Request` - payload failed validation
//! - `409 Conflict` - a unicity constraint holds for another record;
//!   the envelope details carry `{field, existing}`
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
use crate::extractors::Payload;
use crate::handlers::strip_server_fields;
use crate::state::AppState;

/// Handler for the replace interaction.
pub async fn replace_handler<S>(
    State(state): State<AppState<S>>,
    Path((collection, id)): Path<(String, String)>,
    Payload(mut data): Payload,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let resource = state.resource(&collection)?;

    strip_server_fields(&mut data);
    let details = resource.record_schema().validate(&data);
    if !details.is_empty() {
        return Err(RestError::Invalid { details });
    }

    let record = state
        .storage()
        .update(&collection, &id, data, resource.unique_fields())
        .await?;

    debug!(collection = %collection, id = %id, "Record replaced");
    Ok(Json(json!({"data": record})).into_response())
}
