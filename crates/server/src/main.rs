//! Cabinet record server.
//!
//! A small HTTP server exposing JSON record collections with CRUD
//! operations, schema validation, and cursor pagination, backed by the
//! in-memory storage backend.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use cabinet_rest::schema::FieldType;
use cabinet_rest::{Resource, ResourceRegistry, Schema, ServerConfig, init_logging};
use cabinet_storage::MemoryBackend;

/// The resources this server exposes.
///
/// A real deployment would define its own; this binary ships a simple
/// note-taking collection as a working example.
fn resources() -> ResourceRegistry {
    ResourceRegistry::new().register(
        Resource::new("notes")
            .schema(
                Schema::new()
                    .required("title", FieldType::String)
                    .field("content", FieldType::String)
                    .field("pinned", FieldType::Boolean),
            )
            .unique("title"),
    )
}

/// Starts the axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    info!(
        port = config.port,
        host = %config.host,
        "Starting Cabinet record server"
    );

    let storage = Arc::new(MemoryBackend::new());
    let app = cabinet_rest::create_app_with_config(storage, resources(), config.clone());

    serve(app, &config).await
}
