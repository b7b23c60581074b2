//! Postgres OLT 存储实现
//!
//! 删除在事务内完成：先锁定 OLT 行，再统计或级联删除下游 ONT/ODP。

use super::{PgStore, parse_tag};
use crate::error::StorageError;
use crate::models::{OltDependents, OltFilter, OltRecord, OltUpdate};
use crate::traits::OltStore;
use domain::{DeletePolicy, now_epoch_ms};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

const OLT_COLUMNS: &str = "olt_id, name, ip_address, model, vendor, location, status, \
     firmware_version, total_ports, latitude, longitude, description, created_at_ms, updated_at_ms";

fn olt_from_row(row: &PgRow) -> Result<OltRecord, StorageError> {
    let status: String = row.try_get("status")?;
    Ok(OltRecord {
        olt_id: row.try_get("olt_id")?,
        name: row.try_get("name")?,
        ip_address: row.try_get("ip_address")?,
        model: row.try_get("model")?,
        vendor: row.try_get("vendor")?,
        location: row.try_get("location")?,
        status: parse_tag(&status)?,
        firmware_version: row.try_get("firmware_version")?,
        total_ports: row.try_get("total_ports")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        description: row.try_get("description")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

async fn dependents(conn: &mut PgConnection, olt_id: &str) -> Result<OltDependents, StorageError> {
    let row = sqlx::query(
        "select (select count(*) from onts where olt_id = $1) as onts, \
         (select count(*) from odps where olt_id = $1) as odps",
    )
    .bind(olt_id)
    .fetch_one(conn)
    .await?;
    let onts: i64 = row.try_get("onts")?;
    let odps: i64 = row.try_get("odps")?;
    Ok(OltDependents {
        onts: onts.max(0) as u64,
        odps: odps.max(0) as u64,
    })
}

#[async_trait::async_trait]
impl OltStore for PgStore {
    async fn list_olts(&self, filter: &OltFilter) -> Result<Vec<OltRecord>, StorageError> {
        let sql = format!(
            "select {OLT_COLUMNS} from olts where ($1::text is null or status = $1) \
             order by name asc, olt_id asc"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(olt_from_row).collect()
    }

    async fn find_olt(&self, olt_id: &str) -> Result<Option<OltRecord>, StorageError> {
        let sql = format!("select {OLT_COLUMNS} from olts where olt_id = $1");
        let row = sqlx::query(&sql)
            .bind(olt_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(olt_from_row(&row)?))
    }

    async fn create_olt(&self, record: OltRecord) -> Result<OltRecord, StorageError> {
        sqlx::query(
            "insert into olts (olt_id, name, ip_address, model, vendor, location, status, \
             firmware_version, total_ports, latitude, longitude, description, \
             created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(&record.olt_id)
        .bind(&record.name)
        .bind(&record.ip_address)
        .bind(&record.model)
        .bind(&record.vendor)
        .bind(&record.location)
        .bind(record.status.as_str())
        .bind(&record.firmware_version)
        .bind(record.total_ports)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(&record.description)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_olt(
        &self,
        olt_id: &str,
        update: OltUpdate,
    ) -> Result<Option<OltRecord>, StorageError> {
        let sql = format!(
            "update olts set name = $2, ip_address = $3, model = $4, vendor = $5, location = $6, \
             status = $7, firmware_version = $8, total_ports = $9, latitude = $10, \
             longitude = $11, description = $12, updated_at_ms = $13 \
             where olt_id = $1 returning {OLT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(olt_id)
            .bind(&update.name)
            .bind(&update.ip_address)
            .bind(&update.model)
            .bind(&update.vendor)
            .bind(&update.location)
            .bind(update.status.as_str())
            .bind(&update.firmware_version)
            .bind(update.total_ports)
            .bind(update.latitude)
            .bind(update.longitude)
            .bind(&update.description)
            .bind(now_epoch_ms())
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(olt_from_row(&row)?))
    }

    async fn count_olt_dependents(&self, olt_id: &str) -> Result<OltDependents, StorageError> {
        let mut conn = self.pool.acquire().await?;
        dependents(&mut conn, olt_id).await
    }

    async fn delete_olt(&self, olt_id: &str, policy: DeletePolicy) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await?;
        let exists: Option<i32> =
            sqlx::query_scalar("select 1 from olts where olt_id = $1 for update")
                .bind(olt_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(false);
        }

        let refs = dependents(&mut tx, olt_id).await?;
        match policy {
            DeletePolicy::Restrict if !refs.is_empty() => {
                return Err(StorageError::conflict(format!(
                    "olt still referenced by {} ONT(s) and {} ODP(s)",
                    refs.onts, refs.odps
                )));
            }
            DeletePolicy::Restrict => {}
            DeletePolicy::Cascade => {
                sqlx::query("delete from onts where olt_id = $1")
                    .bind(olt_id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("delete from odps where olt_id = $1")
                    .bind(olt_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let result = sqlx::query("delete from olts where olt_id = $1")
            .bind(olt_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
