//! Heartbeat handler.
//!
//! `GET /__heartbeat__` reports storage backend health. Unauthenticated:
//! monitoring probes don't carry credentials.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use cabinet_storage::RecordStorage;

use crate::state::AppState;

/// Handler for the heartbeat endpoint.
///
/// Returns `200 {"storage": true}` when the backend responds, `503`
/// otherwise.
pub async fn heartbeat_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: RecordStorage + Send + Sync,
{
    let healthy = state.storage().heartbeat().await;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(json!({"storage": healthy}))).into_response()
}
