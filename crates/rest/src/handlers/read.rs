//! Read interaction handler.
//!
//! `GET /{collection}/{id}` returns `{"data": record}`, or a 404
//! envelope for unknown records.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use cabinet_storage::RecordStorage;

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for the read interaction.
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    Path((collection, id)): Path<(String, String)>,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    state.resource(&collection)?;
    let record = state.storage().get(&collection, &id).await?;
    Ok(Json(json!({"data": record})).into_response())
}
