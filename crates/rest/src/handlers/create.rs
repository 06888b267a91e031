//! Create interaction handler.
//!
//! `POST /{collection}` with a `{"data": {...}}` payload.
//!
//! # Response
//!
//! - `201 Created` - record created, body is `{"data": record}` with the
//!   server-assigned `id` and `last_modified`
//! - `200 OK` - a unicity constraint already holds for an existing
//!   record; the body is that record's payload (idempotent create)
//! - `400 Bad Request` - payload failed validation
//! - `503 Service Unavailable` - storage backend failure

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use cabinet_storage::{RecordStorage, StorageError};

use crate::error::{RestError, RestResult};
use crate::extractors::Payload;
use crate::handlers::strip_server_fields;
use crate::state::AppState;

/// Handler for the create interaction.
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    Path(collection): Path<String>,
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

    match state
        .storage()
        .create(&collection, data, resource.unique_fields())
        .await
    {
        Ok(record) => {
            debug!(collection = %collection, id = %record["id"], "Record created");
            Ok((StatusCode::CREATED, Json(json!({"data": record}))).into_response())
        }
        // Idempotent create: a unicity conflict surrenders the record
        // that already satisfies the constraint.
        Err(StorageError::Unicity(err)) => {
            debug!(
                collection = %collection,
                field = %err.field,
                "Create matched existing record"
            );
            Ok((StatusCode::OK, Json(err.existing)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}
