//! In-memory storage backend.
//!
//! A reference [`RecordStorage`] implementation holding every collection
//! in process memory behind a [`parking_lot::RwLock`]. Used by the test
//! suites and the demo server; data does not survive a restart.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::core::RecordStorage;
use crate::error::{RecordError, StorageResult, UnicityError};
use crate::types::{Page, PaginationToken, SortDirection, Sorting};

/// One in-memory collection: records keyed by id, plus the timestamp of
/// the most recent write.
#[derive(Debug, Default)]
struct Collection {
    records: HashMap<String, Value>,
    last_timestamp: u64,
}

impl Collection {
    /// Next collection timestamp: wall clock epoch milliseconds, bumped
    /// to stay strictly monotonic when writes land within the same
    /// millisecond.
    fn bump_timestamp(&mut self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let ts = if now > self.last_timestamp {
            now
        } else {
            self.last_timestamp + 1
        };
        self.last_timestamp = ts;
        ts
    }
}

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the declared unique fields of `record` against every other
    /// record in the collection. `skip_id` excludes the record being
    /// replaced from the scan.
    fn check_unicity(
        collection: &Collection,
        record: &Value,
        unique_fields: &[String],
        skip_id: Option<&str>,
    ) -> Result<(), UnicityError> {
        for field in unique_fields {
            let Some(value) = record.get(field) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            for (id, existing) in &collection.records {
                if skip_id == Some(id.as_str()) {
                    continue;
                }
                if existing.get(field) == Some(value) {
                    return Err(UnicityError::new(field.clone(), existing.clone()));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStorage for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        collection: &str,
        mut record: Value,
        unique_fields: &[String],
    ) -> StorageResult<Value> {
        let mut collections = self.collections.write();
        let coll = collections.entry(collection.to_string()).or_default();

        Self::check_unicity(coll, &record, unique_fields, None)?;

        let id = Uuid::new_v4().to_string();
        let timestamp = coll.bump_timestamp();
        record["id"] = json!(id);
        record["last_modified"] = json!(timestamp);

        debug!(collection = %collection, id = %id, "Record created");
        coll.records.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, collection: &str, id: &str) -> StorageResult<Value> {
        let collections = self.collections.read();
        collections
            .get(collection)
            .and_then(|coll| coll.records.get(id))
            .cloned()
            .ok_or_else(|| {
                RecordError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        mut record: Value,
        unique_fields: &[String],
    ) -> StorageResult<Value> {
        let mut collections = self.collections.write();
        let coll = collections.entry(collection.to_string()).or_default();

        Self::check_unicity(coll, &record, unique_fields, Some(id))?;

        let timestamp = coll.bump_timestamp();
        record["id"] = json!(id);
        record["last_modified"] = json!(timestamp);

        debug!(collection = %collection, id = %id, "Record replaced");
        coll.records.insert(id.to_string(), record.clone());
        Ok(record)
    }

    async fn delete(&self, collection: &str, id: &str) -> StorageResult<Value> {
        let mut collections = self.collections.write();
        collections
            .get_mut(collection)
            .and_then(|coll| coll.records.remove(id))
            .ok_or_else(|| {
                RecordError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn delete_all(&self, collection: &str) -> StorageResult<Vec<Value>> {
        let mut collections = self.collections.write();
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(Vec::new());
        };

        let mut deleted: Vec<Value> = coll.records.drain().map(|(_, v)| v).collect();
        sort_records(&mut deleted, &Sorting::default());
        Ok(deleted)
    }

    async fn list(
        &self,
        collection: &str,
        sorting: &Sorting,
        token: Option<&PaginationToken>,
        limit: Option<usize>,
    ) -> StorageResult<Page> {
        let collections = self.collections.read();
        let mut records: Vec<Value> = collections
            .get(collection)
            .map(|coll| coll.records.values().cloned().collect())
            .unwrap_or_default();

        sort_records(&mut records, sorting);

        // Resume after the token position (keyset pagination).
        if let Some(token) = token {
            records.retain(|record| is_after_token(record, token, sorting));
        }

        let Some(limit) = limit else {
            return Ok(Page::complete(records));
        };

        if records.len() <= limit {
            return Ok(Page::complete(records));
        }

        records.truncate(limit);
        let next_token = records
            .last()
            .map(|last| PaginationToken::from_record(last, sorting));
        Ok(Page {
            records,
            next_token,
        })
    }

    async fn count(&self, collection: &str) -> StorageResult<u64> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|coll| coll.records.len() as u64)
            .unwrap_or(0))
    }

    async fn collection_timestamp(&self, collection: &str) -> StorageResult<u64> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|coll| coll.last_timestamp)
            .unwrap_or(0))
    }

    async fn heartbeat(&self) -> bool {
        true
    }
}

/// Sorts records on the sort field, record id as tie-break.
fn sort_records(records: &mut [Value], sorting: &Sorting) {
    records.sort_by(|a, b| {
        let field_cmp = compare_values(a.get(&sorting.field), b.get(&sorting.field));
        let field_cmp = match sorting.direction {
            SortDirection::Ascending => field_cmp,
            SortDirection::Descending => field_cmp.reverse(),
        };
        field_cmp.then_with(|| compare_values(a.get("id"), b.get("id")))
    });
}

/// Whether `record` sorts strictly after the token position.
fn is_after_token(record: &Value, token: &PaginationToken, sorting: &Sorting) -> bool {
    let field_cmp = compare_values(record.get(&sorting.field), token.value(&sorting.field));
    let field_cmp = match sorting.direction {
        SortDirection::Ascending => field_cmp,
        SortDirection::Descending => field_cmp.reverse(),
    };
    match field_cmp {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => compare_values(record.get("id"), token.id()) == Ordering::Greater,
    }
}

/// Total order over JSON scalar values: null < bool < number < string.
/// Missing fields compare as null.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
