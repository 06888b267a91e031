//! Cabinet Storage Layer
//!
//! This crate provides the storage backend abstraction for the Cabinet
//! record server: plain JSON records grouped into named collections,
//! with server-assigned ids and timestamps, declared-field unicity, and
//! keyset pagination.
//!
//! # Architecture
//!
//! The crate is organized into a few modules:
//!
//! - [`core`] - The [`RecordStorage`] trait every backend implements
//! - [`error`] - Error hierarchy (record state, unicity, backend failures)
//! - [`types`] - Sorting, pagination tokens, and result pages
//! - [`memory`] - In-memory reference backend
//!
//! # Quick Start
//!
//! ```no_run
//! use cabinet_storage::{MemoryBackend, RecordStorage, Sorting};
//! use serde_json::json;
//!
//! # async fn example() -> cabinet_storage::StorageResult<()> {
//! let backend = MemoryBackend::new();
//!
//! // The backend assigns id and last_modified.
//! let stored = backend
//!     .create("mushrooms", json!({"name": "Champignon"}), &[])
//!     .await?;
//! assert!(stored["id"].is_string());
//!
//! let page = backend
//!     .list("mushrooms", &Sorting::default(), None, Some(10))
//!     .await?;
//! assert_eq!(page.records.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Error model
//!
//! Unicity violations carry the conflicting record back to the caller
//! ([`UnicityError`]), so the REST layer can implement idempotent-create
//! semantics. Unexpected backend failures are wrapped in an opaque
//! [`BackendError`] whose cause is preserved for logging but never
//! exposed to clients.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod core;
pub mod error;
pub mod memory;
pub mod types;

pub use self::core::RecordStorage;
pub use error::{
    BackendError, PaginationError, RecordError, StorageError, StorageResult, UnicityError,
};
pub use memory::MemoryBackend;
pub use types::{Page, PaginationToken, SortDirection, Sorting};
