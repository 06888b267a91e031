//! Delete interaction handlers.
//!
//! `DELETE /{collection}/{id}` deletes one record; `DELETE
//! /{collection}` empties the collection. Both return the deleted
//! record(s) under `data`.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use cabinet_storage::RecordStorage;

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for deleting one record.
pub async fn delete_record_handler<S>(
    State(state): State<AppState<S>>,
    Path((collection, id)): Path<(String, String)>,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    state.resource(&collection)?;
    let record = state.storage().delete(&collection, &id).await?;

    debug!(collection = %collection, id = %id, "Record deleted");
    Ok(Json(json!({"data": record})).into_response())
}

/// Handler for emptying a collection.
pub async fn delete_collection_handler<S>(
    State(state): State<AppState<S>>,
    Path(collection): Path<String>,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    state.resource(&collection)?;
    let records = state.storage().delete_all(&collection).await?;

    debug!(collection = %collection, count = records.len(), "Collection emptied");
    Ok(Json(json!({"data": records})).into_response())
}
