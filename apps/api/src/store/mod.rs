//! Record Store — generic persistence addressed by collection name and record id.
//!
//! Records travel as JSON objects. Every record carries an `id` (UUID string);
//! the store stamps `_createdDate` / `_updatedDate` itself.
//!
//! `AppState` holds an `Arc<dyn RecordStore>`, chosen at startup via `STORE_BACKEND`.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

pub mod memory;
pub mod postgres;
#[cfg(test)]
pub mod testing;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

pub const CREATED_DATE_KEY: &str = "_createdDate";
pub const UPDATED_DATE_KEY: &str = "_updatedDate";

// ────────────────────────────────────────────────────────────────────────────
// Collections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    JobApplications,
    ResumeVersions,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::JobApplications => "jobapplications",
            Collection::ResumeVersions => "resumeversions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jobapplications" => Ok(Collection::JobApplications),
            "resumeversions" => Ok(Collection::ResumeVersions),
            other => Err(StoreError::Invalid(format!("unknown collection '{other}'"))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: Uuid },

    #[error("{collection} record {id} already exists")]
    Conflict { collection: Collection, id: Uuid },

    #[error("Invalid record: {0}")]
    Invalid(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Not-found is the only failure callers tell apart from a generic fetch failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Result of `get_all`; mirrors the `{ items: [...] }` envelope of the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub items: Vec<T>,
}

/// A raw stored record.
pub type Record = Map<String, Value>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create(&self, collection: Collection, record: Record) -> Result<Record, StoreError>;

    async fn get_by_id(&self, collection: Collection, id: Uuid) -> Result<Record, StoreError>;

    async fn get_all(&self, collection: Collection) -> Result<ListResult<Record>, StoreError>;

    /// Merges `partial` into the stored record. Keys missing from `partial` are
    /// left unchanged, `null` values remove the key. `id` never changes.
    async fn update(&self, collection: Collection, partial: Record) -> Result<Record, StoreError>;

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Shared record plumbing (used by every backend)
// ────────────────────────────────────────────────────────────────────────────

/// Extracts and parses the `id` field of a record.
pub fn record_id(record: &Record) -> Result<Uuid, StoreError> {
    let raw = record
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Invalid("record has no string 'id'".to_string()))?;
    Uuid::parse_str(raw).map_err(|e| StoreError::Invalid(format!("record id '{raw}': {e}")))
}

/// Applies a partial update to `target`: `null` removes, anything else overwrites.
pub fn merge_partial(target: &mut Record, partial: Record) {
    for (key, value) in partial {
        if key == "id" || key == CREATED_DATE_KEY || key == UPDATED_DATE_KEY {
            continue;
        }
        if value.is_null() {
            target.remove(&key);
        } else {
            target.insert(key, value);
        }
    }
}

/// Drops `null` fields so absent and null are stored the same way.
pub fn strip_nulls(record: &mut Record) {
    record.retain(|_, v| !v.is_null());
}

pub fn stamp(record: &mut Record, key: &str, at: chrono::DateTime<chrono::Utc>) {
    record.insert(key.to_string(), Value::String(at.to_rfc3339()));
}

// ────────────────────────────────────────────────────────────────────────────
// Typed access
// ────────────────────────────────────────────────────────────────────────────

/// A record type that lives in exactly one collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> Uuid;
}

fn to_record<T: Serialize>(value: &T) -> Result<Record, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Invalid(format!("expected a JSON object, got {other}"))),
    }
}

fn from_record<T: DeserializeOwned>(record: Record) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

pub async fn create<T: Entity>(store: &dyn RecordStore, entity: &T) -> Result<T, StoreError> {
    let stored = store.create(T::COLLECTION, to_record(entity)?).await?;
    from_record(stored)
}

pub async fn get_by_id<T: Entity>(store: &dyn RecordStore, id: Uuid) -> Result<T, StoreError> {
    from_record(store.get_by_id(T::COLLECTION, id).await?)
}

/// Records that do not decode as `T` are skipped and logged; the rest are
/// still returned.
pub async fn get_all<T: Entity>(store: &dyn RecordStore) -> Result<ListResult<T>, StoreError> {
    let ListResult { items } = store.get_all(T::COLLECTION).await?;
    let items = items
        .into_iter()
        .filter_map(|record| {
            let id = record.get("id").cloned().unwrap_or(Value::Null);
            match from_record::<T>(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping undecodable {} record {id}: {e}", T::COLLECTION);
                    None
                }
            }
        })
        .collect();
    Ok(ListResult { items })
}

/// Sends a partial update. `patch` must serialize to an object; its `id`
/// field is filled in from `id`.
pub async fn update<T: Entity, P: Serialize>(
    store: &dyn RecordStore,
    id: Uuid,
    patch: &P,
) -> Result<T, StoreError> {
    let mut partial = to_record(patch)?;
    partial.insert("id".to_string(), Value::String(id.to_string()));
    from_record(store.update(T::COLLECTION, partial).await?)
}

pub async fn delete<T: Entity>(store: &dyn RecordStore, id: Uuid) -> Result<(), StoreError> {
    store.delete(T::COLLECTION, id).await
}
