//! Application state for the Cabinet REST API.
//!
//! Shared state available to all request handlers: the storage backend,
//! the server configuration, and the registered resources.

use std::sync::Arc;

use cabinet_storage::RecordStorage;

use crate::config::ServerConfig;
use crate::error::{RestError, RestResult};
use crate::resource::{Resource, ResourceRegistry};

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`RecordStorage`])
pub struct AppState<S> {
    storage: Arc<S>,
    config: Arc<ServerConfig>,
    resources: Arc<ResourceRegistry>,
}

// Manually implement Clone since S is behind an Arc and doesn't need to
// be Clone itself.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
            resources: Arc::clone(&self.resources),
        }
    }
}

impl<S: RecordStorage> AppState<S> {
    /// Creates a new state from a backend, configuration, and resource
    /// registry.
    pub fn new(storage: Arc<S>, config: ServerConfig, resources: ResourceRegistry) -> Self {
        Self {
            storage,
            config: Arc::new(config),
            resources: Arc::new(resources),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Resolves a collection name to its registered resource, or a 404
    /// error for unknown collections.
    pub fn resource(&self, collection: &str) -> RestResult<&Resource> {
        self.resources.get(collection).ok_or_else(|| RestError::NotFound {
            collection: collection.to_string(),
            id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabinet_storage::MemoryBackend;

    #[test]
    fn unknown_collection_is_not_found() {
        let state = AppState::new(
            Arc::new(MemoryBackend::new()),
            ServerConfig::default(),
            ResourceRegistry::new().register(Resource::new("mushrooms")),
        );

        assert!(state.resource("mushrooms").is_ok());
        assert!(matches!(
            state.resource("toads"),
            Err(RestError::NotFound { id: None, .. })
        ));
    }
}
