//! Route configuration.
//!
//! All collection and record routes sit behind the authentication
//! middleware; the heartbeat endpoint stays open for monitoring probes.

use axum::{
    Router,
    middleware::from_fn,
    routing::get,
};

use cabinet_storage::RecordStorage;

use crate::handlers;
use crate::middleware::require_authentication;
use crate::state::AppState;

/// Creates all record resource routes.
///
/// ## Collection-level
/// - `GET /{collection}` - List
/// - `POST /{collection}` - Create
/// - `DELETE /{collection}` - Delete all
///
/// ## Record-level
/// - `GET /{collection}/{id}` - Read
/// - `PUT /{collection}/{id}` - Replace
/// - `PATCH /{collection}/{id}` - Modify
/// - `DELETE /{collection}/{id}` - Delete
///
/// ## System-level
/// - `GET /__heartbeat__` - Storage health (no authentication)
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    let protected = Router::new()
        .route(
            "/{collection}",
            get(handlers::list_handler::<S>)
                .post(handlers::create_handler::<S>)
                .delete(handlers::delete_collection_handler::<S>),
        )
        .route(
            "/{collection}/{id}",
            get(handlers::read_handler::<S>)
                .put(handlers::replace_handler::<S>)
                .patch(handlers::patch_handler::<S>)
                .delete(handlers::delete_record_handler::<S>),
        )
        .layer(from_fn(require_authentication));

    Router::new()
        .route("/__heartbeat__", get(handlers::heartbeat_handler::<S>))
        .merge(protected)
        .with_state(state)
}
