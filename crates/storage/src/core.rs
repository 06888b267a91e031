//! Core record storage trait.
//!
//! This module defines the [`RecordStorage`] trait, which provides the
//! fundamental CRUD operations for JSON records grouped into collections.
//!
//! # Server-assigned fields
//!
//! Backends assign the `id` (UUID) and `last_modified` (epoch
//! milliseconds, strictly monotonic per collection) fields of every
//! stored record. Client-supplied values for either field never survive
//! a write; callers are expected to strip them before handing the record
//! over, and backends overwrite them regardless.
//!
//! # Unicity
//!
//! `create` and `update` receive the collection's declared unique fields.
//! A write that would duplicate a unique field value fails with
//! [`UnicityError`](crate::error::UnicityError) carrying the existing
//! record, letting the caller decide between idempotent-create semantics
//! and a conflict report.
//!
//! # Failures
//!
//! Every operation may fail with an opaque
//! [`BackendError`](crate::error::BackendError); a single attempt is made
//! per call and retries are the caller's concern (the REST layer makes
//! none).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageResult;
use crate::types::{Page, PaginationToken, Sorting};

/// Core storage trait for JSON record collections.
///
/// # Example
///
/// ```ignore
/// use cabinet_storage::{RecordStorage, Sorting};
///
/// async fn example<S: RecordStorage>(storage: &S) -> cabinet_storage::StorageResult<()> {
///     let record = serde_json::json!({"name": "Champignon"});
///     let stored = storage.create("mushrooms", record, &[]).await?;
///
///     let page = storage
///         .list("mushrooms", &Sorting::default(), None, Some(10))
///         .await?;
///     assert_eq!(page.records.len(), 1);
///
///     storage.delete("mushrooms", stored["id"].as_str().unwrap()).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Creates a new record in `collection`.
    ///
    /// Assigns `id` and `last_modified`, then persists the record.
    ///
    /// # Errors
    ///
    /// * `StorageError::Unicity` - a field in `unique_fields` would be duplicated
    /// * `StorageError::Backend` - the backend failed
    async fn create(
        &self,
        collection: &str,
        record: Value,
        unique_fields: &[String],
    ) -> StorageResult<Value>;

    /// Fetches a record by id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Record(NotFound)` - no such record
    async fn get(&self, collection: &str, id: &str) -> StorageResult<Value>;

    /// Replaces the record with the given id, creating it if absent
    /// (PUT semantics). `last_modified` is re-assigned on every write.
    ///
    /// # Errors
    ///
    /// * `StorageError::Unicity` - a field in `unique_fields` would be duplicated
    async fn update(
        &self,
        collection: &str,
        id: &str,
        record: Value,
        unique_fields: &[String],
    ) -> StorageResult<Value>;

    /// Deletes a record by id, returning the deleted record.
    ///
    /// # Errors
    ///
    /// * `StorageError::Record(NotFound)` - no such record
    async fn delete(&self, collection: &str, id: &str) -> StorageResult<Value>;

    /// Deletes every record in `collection`, returning the deleted
    /// records in default sort order.
    async fn delete_all(&self, collection: &str) -> StorageResult<Vec<Value>>;

    /// Lists records in sort order.
    ///
    /// `token` resumes a previous listing; `limit` caps the page size
    /// and must be positive when given, since the continuation cursor
    /// is keyed off the last record of the page. When more records
    /// remain past the page, the returned [`Page::next_token`] is set.
    async fn list(
        &self,
        collection: &str,
        sorting: &Sorting,
        token: Option<&PaginationToken>,
        limit: Option<usize>,
    ) -> StorageResult<Page>;

    /// Returns the number of records in `collection`.
    async fn count(&self, collection: &str) -> StorageResult<u64>;

    /// Returns the collection's current timestamp: the `last_modified`
    /// of its most recent write, or 0 if never written.
    async fn collection_timestamp(&self, collection: &str) -> StorageResult<u64>;

    /// Ping the backend, for health reporting.
    async fn heartbeat(&self) -> bool;
}
