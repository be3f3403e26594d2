//! Store doubles for controller tests.

use async_trait::async_trait;
use uuid::Uuid;

use super::{Collection, ListResult, Record, RecordStore, StoreError};

/// Every call fails as if the backend were unreachable.
pub struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl RecordStore for UnavailableStore {
    async fn create(&self, _: Collection, _: Record) -> Result<Record, StoreError> {
        Err(unavailable())
    }

    async fn get_by_id(&self, _: Collection, _: Uuid) -> Result<Record, StoreError> {
        Err(unavailable())
    }

    async fn get_all(&self, _: Collection) -> Result<ListResult<Record>, StoreError> {
        Err(unavailable())
    }

    async fn update(&self, _: Collection, _: Record) -> Result<Record, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _: Collection, _: Uuid) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
