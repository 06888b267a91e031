//! # cabinet-rest - Generic CRUD Record Resource Layer
//!
//! This crate exposes JSON record collections over HTTP: create, read,
//! replace, modify, delete, and paginated listing, with schema
//! validation, a canonical JSON error envelope, and `Next-Page`
//! continuation URLs derived from the inbound request context.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cabinet_rest::{Resource, ResourceRegistry, Schema, ServerConfig, create_app};
//! use cabinet_rest::schema::FieldType;
//! use cabinet_storage::MemoryBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let resources = ResourceRegistry::new().register(
//!         Resource::new("mushrooms")
//!             .schema(Schema::new().required("name", FieldType::String)),
//!     );
//!
//!     let app = create_app(Arc::new(MemoryBackend::new()), resources);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error envelope
//!
//! All errors are JSON envelopes with a stable numeric `errno`:
//!
//! | HTTP Status | errno | Description |
//! |-------------|-------|-------------|
//! | 400 | 107 | Payload or parameter validation failure |
//! | 401 | 104/105 | Missing or malformed credentials |
//! | 404 | 110 | Unknown record or collection |
//! | 409 | 122 | Unicity conflict on replace/modify |
//! | 503 | 201 | Storage backend failure (cause logged, not exposed) |
//!
//! A unicity conflict during create is served as `200 OK` with the
//! existing record: creates are idempotent with respect to declared
//! unique fields.
//!
//! ## Architecture
//!
//! - [`error`] - Error envelope translator
//! - [`schema`] - Payload schema validation
//! - [`resource`] - Resource registration
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, config, resources)
//! - [`extractors`] - Payload extraction (`data` member handling)
//! - [`middleware`] - Basic authentication
//! - [`handlers`] - One handler per interaction
//! - [`responses`] - Listing headers and `Next-Page` URL construction
//! - [`routing`] - Route configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod resource;
pub mod responses;
pub mod routing;
pub mod schema;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{Errno, ErrorDetail, ErrorResponse, Location, RestError, RestResult};
pub use resource::{Resource, ResourceRegistry};
pub use schema::Schema;
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use cabinet_storage::RecordStorage;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: Arc<S>, resources: ResourceRegistry) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, resources, ServerConfig::default())
}

/// Creates the axum application with custom configuration.
///
/// Wires routes, the trace/timeout middleware stack, and CORS when
/// enabled.
pub fn create_app_with_config<S>(
    storage: Arc<S>,
    resources: ResourceRegistry,
    config: ServerConfig,
) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    info!(backend = %storage.backend_name(), "Creating record server");

    let enable_cors = config.enable_cors;
    let request_timeout = config.request_timeout;

    let state = AppState::new(storage, config, resources);
    let router = routing::create_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)));

    if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Call once at application startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "cabinet_rest={level},cabinet_storage={level},tower_http=debug"
            ))
        });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
