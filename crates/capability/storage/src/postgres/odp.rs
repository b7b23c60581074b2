//! Postgres ODP 存储实现

use super::{PgStore, parse_tag};
use crate::error::StorageError;
use crate::models::{OdpFilter, OdpRecord, OdpUpdate};
use crate::traits::OdpStore;
use domain::now_epoch_ms;
use sqlx::Row;
use sqlx::postgres::PgRow;

const ODP_COLUMNS: &str = "odp_id, name, location, latitude, longitude, capacity, status, olt_id, \
     created_at_ms, updated_at_ms";

fn odp_from_row(row: &PgRow) -> Result<OdpRecord, StorageError> {
    let status: String = row.try_get("status")?;
    Ok(OdpRecord {
        odp_id: row.try_get("odp_id")?,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        capacity: row.try_get("capacity")?,
        status: parse_tag(&status)?,
        olt_id: row.try_get("olt_id")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl OdpStore for PgStore {
    async fn list_odps(&self, filter: &OdpFilter) -> Result<Vec<OdpRecord>, StorageError> {
        let sql = format!(
            "select {ODP_COLUMNS} from odps \
             where ($1::text is null or olt_id = $1) and ($2::text is null or status = $2) \
             order by created_at_ms desc, odp_id asc"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.olt_id.as_deref())
            .bind(filter.status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(odp_from_row).collect()
    }

    async fn find_odp(&self, odp_id: &str) -> Result<Option<OdpRecord>, StorageError> {
        let sql = format!("select {ODP_COLUMNS} from odps where odp_id = $1");
        let row = sqlx::query(&sql)
            .bind(odp_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(odp_from_row(&row)?))
    }

    async fn create_odp(&self, record: OdpRecord) -> Result<OdpRecord, StorageError> {
        sqlx::query(
            "insert into odps (odp_id, name, location, latitude, longitude, capacity, status, \
             olt_id, created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&record.odp_id)
        .bind(&record.name)
        .bind(&record.location)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.capacity)
        .bind(record.status.as_str())
        .bind(&record.olt_id)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_odp(
        &self,
        odp_id: &str,
        update: OdpUpdate,
    ) -> Result<Option<OdpRecord>, StorageError> {
        let sql = format!(
            "update odps set name = $2, location = $3, latitude = $4, longitude = $5, \
             capacity = $6, status = $7, olt_id = $8, updated_at_ms = $9 \
             where odp_id = $1 returning {ODP_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(odp_id)
            .bind(&update.name)
            .bind(&update.location)
            .bind(update.latitude)
            .bind(update.longitude)
            .bind(update.capacity)
            .bind(update.status.as_str())
            .bind(&update.olt_id)
            .bind(now_epoch_ms())
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(odp_from_row(&row)?))
    }

    async fn delete_odp(&self, odp_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from odps where odp_id = $1")
            .bind(odp_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
