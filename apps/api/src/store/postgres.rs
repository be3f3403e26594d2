use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    merge_partial, record_id, stamp, strip_nulls, Collection, ListResult, Record, RecordStore,
    StoreError, CREATED_DATE_KEY, UPDATED_DATE_KEY,
};

/// PostgreSQL-backed record store. Every collection shares one `records`
/// table; the record body lives in a JSONB column.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `records` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                seq        BIGSERIAL,
                collection TEXT        NOT NULL,
                id         UUID        NOT NULL,
                data       JSONB       NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        info!("Record store schema ready");
        Ok(())
    }
}

fn into_record(value: Value) -> Result<Record, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Invalid(format!("stored data is not an object: {other}"))),
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(&self, collection: Collection, mut record: Record) -> Result<Record, StoreError> {
        let id = record_id(&record)?;
        strip_nulls(&mut record);
        let now = Utc::now();
        stamp(&mut record, CREATED_DATE_KEY, now);
        stamp(&mut record, UPDATED_DATE_KEY, now);

        let inserted: Option<Value> = sqlx::query_scalar(
            r#"
            INSERT INTO records (collection, id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (collection, id) DO NOTHING
            RETURNING data
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Value::Object(record))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        let data = inserted.ok_or(StoreError::Conflict { collection, id })?;
        debug!("pg store: created {collection}/{id}");
        into_record(data)
    }

    async fn get_by_id(&self, collection: Collection, id: Uuid) -> Result<Record, StoreError> {
        let data: Option<Value> =
            sqlx::query_scalar("SELECT data FROM records WHERE collection = $1 AND id = $2")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        into_record(data.ok_or(StoreError::NotFound { collection, id })?)
    }

    async fn get_all(&self, collection: Collection) -> Result<ListResult<Record>, StoreError> {
        let rows: Vec<Value> =
            sqlx::query_scalar("SELECT data FROM records WHERE collection = $1 ORDER BY seq ASC")
                .bind(collection.as_str())
                .fetch_all(&self.pool)
                .await?;
        let items = rows.into_iter().map(into_record).collect::<Result<_, _>>()?;
        Ok(ListResult { items })
    }

    async fn update(&self, collection: Collection, partial: Record) -> Result<Record, StoreError> {
        let id = record_id(&partial)?;
        let mut tx = self.pool.begin().await?;

        let current: Option<Value> = sqlx::query_scalar(
            "SELECT data FROM records WHERE collection = $1 AND id = $2 FOR UPDATE",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut record = into_record(current.ok_or(StoreError::NotFound { collection, id })?)?;

        merge_partial(&mut record, partial);
        let now = Utc::now();
        stamp(&mut record, UPDATED_DATE_KEY, now);

        sqlx::query(
            "UPDATE records SET data = $3, updated_at = $4 WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Value::Object(record.clone()))
        .bind(now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!("pg store: updated {collection}/{id}");
        Ok(record)
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { collection, id });
        }
        debug!("pg store: deleted {collection}/{id}");
        Ok(())
    }
}
