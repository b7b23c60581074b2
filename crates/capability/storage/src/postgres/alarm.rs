//! Postgres 告警存储实现

use super::{PgStore, parse_tag};
use crate::error::StorageError;
use crate::models::{AlarmFilter, AlarmRecord, AlarmUpdate};
use crate::traits::AlarmStore;
use domain::now_epoch_ms;
use sqlx::Row;
use sqlx::postgres::PgRow;

const ALARM_COLUMNS: &str = "alarm_id, device_type, olt_id, ont_id, severity, message, \
     description, status, resolved_at_ms, created_at_ms, updated_at_ms";

fn alarm_from_row(row: &PgRow) -> Result<AlarmRecord, StorageError> {
    let device_type: String = row.try_get("device_type")?;
    let severity: String = row.try_get("severity")?;
    let status: String = row.try_get("status")?;
    Ok(AlarmRecord {
        alarm_id: row.try_get("alarm_id")?,
        device_type: parse_tag(&device_type)?,
        olt_id: row.try_get("olt_id")?,
        ont_id: row.try_get("ont_id")?,
        severity: parse_tag(&severity)?,
        message: row.try_get("message")?,
        description: row.try_get("description")?,
        status: parse_tag(&status)?,
        resolved_at_ms: row.try_get("resolved_at_ms")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl AlarmStore for PgStore {
    async fn list_alarms(&self, filter: &AlarmFilter) -> Result<Vec<AlarmRecord>, StorageError> {
        let sql = format!(
            "select {ALARM_COLUMNS} from alarms \
             where ($1::text is null or status = $1) and ($2::text is null or severity = $2) \
             and ($3::text is null or device_type = $3) \
             order by created_at_ms desc, alarm_id asc"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.status.map(|status| status.as_str()))
            .bind(filter.severity.map(|severity| severity.as_str()))
            .bind(filter.device_type.map(|device_type| device_type.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(alarm_from_row).collect()
    }

    async fn find_alarm(&self, alarm_id: &str) -> Result<Option<AlarmRecord>, StorageError> {
        let sql = format!("select {ALARM_COLUMNS} from alarms where alarm_id = $1");
        let row = sqlx::query(&sql)
            .bind(alarm_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(alarm_from_row(&row)?))
    }

    async fn create_alarm(&self, record: AlarmRecord) -> Result<AlarmRecord, StorageError> {
        sqlx::query(
            "insert into alarms (alarm_id, device_type, olt_id, ont_id, severity, message, \
             description, status, resolved_at_ms, created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&record.alarm_id)
        .bind(record.device_type.as_str())
        .bind(&record.olt_id)
        .bind(&record.ont_id)
        .bind(record.severity.as_str())
        .bind(&record.message)
        .bind(&record.description)
        .bind(record.status.as_str())
        .bind(record.resolved_at_ms)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_alarm(
        &self,
        alarm_id: &str,
        update: AlarmUpdate,
    ) -> Result<Option<AlarmRecord>, StorageError> {
        // 已解决的告警再次保存为 RESOLVED 时保留原解决时间
        let sql = format!(
            "update alarms set device_type = $2, olt_id = $3, ont_id = $4, severity = $5, \
             message = $6, description = $7, status = $8, \
             resolved_at_ms = case when $8 = 'RESOLVED' \
             then coalesce(resolved_at_ms, $9) else null end, \
             updated_at_ms = $9 \
             where alarm_id = $1 returning {ALARM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(alarm_id)
            .bind(update.device_type.as_str())
            .bind(&update.olt_id)
            .bind(&update.ont_id)
            .bind(update.severity.as_str())
            .bind(&update.message)
            .bind(&update.description)
            .bind(update.status.as_str())
            .bind(now_epoch_ms())
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(alarm_from_row(&row)?))
    }

    async fn resolve_alarm(
        &self,
        alarm_id: &str,
        at_ms: i64,
    ) -> Result<Option<AlarmRecord>, StorageError> {
        let sql = format!(
            "update alarms set \
             resolved_at_ms = case when status = 'RESOLVED' then resolved_at_ms else $2 end, \
             updated_at_ms = case when status = 'RESOLVED' then updated_at_ms else $2 end, \
             status = 'RESOLVED' \
             where alarm_id = $1 returning {ALARM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(alarm_id)
            .bind(at_ms)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(alarm_from_row(&row)?))
    }

    async fn delete_alarm(&self, alarm_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from alarms where alarm_id = $1")
            .bind(alarm_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
