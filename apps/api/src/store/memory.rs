use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{
    merge_partial, record_id, stamp, strip_nulls, Collection, ListResult, Record, RecordStore,
    StoreError, CREATED_DATE_KEY, UPDATED_DATE_KEY,
};

/// In-process record store. Records keep insertion order per collection.
#[derive(Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<Collection, Vec<(Uuid, Record)>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, collection: Collection, mut record: Record) -> Result<Record, StoreError> {
        let id = record_id(&record)?;
        strip_nulls(&mut record);
        let now = Utc::now();
        stamp(&mut record, CREATED_DATE_KEY, now);
        stamp(&mut record, UPDATED_DATE_KEY, now);

        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection).or_default();
        if rows.iter().any(|(existing, _)| *existing == id) {
            return Err(StoreError::Conflict { collection, id });
        }
        rows.push((id, record.clone()));
        debug!("memory store: created {collection}/{id}");
        Ok(record)
    }

    async fn get_by_id(&self, collection: Collection, id: Uuid) -> Result<Record, StoreError> {
        let collections = self.collections.read().await;
        collections
            .get(&collection)
            .and_then(|rows| rows.iter().find(|(rid, _)| *rid == id))
            .map(|(_, record)| record.clone())
            .ok_or(StoreError::NotFound { collection, id })
    }

    async fn get_all(&self, collection: Collection) -> Result<ListResult<Record>, StoreError> {
        let collections = self.collections.read().await;
        let items = collections
            .get(&collection)
            .map(|rows| rows.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default();
        Ok(ListResult { items })
    }

    async fn update(&self, collection: Collection, partial: Record) -> Result<Record, StoreError> {
        let id = record_id(&partial)?;
        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|(rid, _)| *rid == id))
            .map(|(_, record)| record)
            .ok_or(StoreError::NotFound { collection, id })?;

        merge_partial(record, partial);
        stamp(record, UPDATED_DATE_KEY, Utc::now());
        debug!("memory store: updated {collection}/{id}");
        Ok(record.clone())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let rows = collections
            .get_mut(&collection)
            .ok_or(StoreError::NotFound { collection, id })?;
        let before = rows.len();
        rows.retain(|(rid, _)| *rid != id);
        if rows.len() == before {
            return Err(StoreError::NotFound { collection, id });
        }
        debug!("memory store: deleted {collection}/{id}");
        Ok(())
    }
}
