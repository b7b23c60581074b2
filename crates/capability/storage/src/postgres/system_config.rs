//! Postgres 系统配置存储实现

use super::PgStore;
use crate::error::StorageError;
use crate::models::SystemConfigRecord;
use crate::traits::SystemConfigStore;
use sqlx::Row;
use sqlx::postgres::PgRow;

fn config_from_row(row: &PgRow) -> Result<SystemConfigRecord, StorageError> {
    Ok(SystemConfigRecord {
        key: row.try_get("key")?,
        value: row.try_get("value")?,
        description: row.try_get("description")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl SystemConfigStore for PgStore {
    async fn list_configs(&self) -> Result<Vec<SystemConfigRecord>, StorageError> {
        let rows = sqlx::query(
            "select key, value, description, updated_at_ms from system_configs order by key asc",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(config_from_row).collect()
    }

    async fn find_config(&self, key: &str) -> Result<Option<SystemConfigRecord>, StorageError> {
        let row = sqlx::query(
            "select key, value, description, updated_at_ms from system_configs where key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(config_from_row(&row)?))
    }

    async fn upsert_config(
        &self,
        record: SystemConfigRecord,
    ) -> Result<SystemConfigRecord, StorageError> {
        let row = sqlx::query(
            "insert into system_configs (key, value, description, updated_at_ms) \
             values ($1, $2, $3, $4) \
             on conflict (key) do update \
             set value = excluded.value, updated_at_ms = excluded.updated_at_ms \
             returning key, value, description, updated_at_ms",
        )
        .bind(&record.key)
        .bind(&record.value)
        .bind(&record.description)
        .bind(record.updated_at_ms)
        .fetch_one(&self.pool)
        .await?;
        config_from_row(&row)
    }
}
