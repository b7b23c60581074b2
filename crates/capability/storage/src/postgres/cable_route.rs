//! Postgres 光缆路由存储实现
//!
//! 坐标序列以 JSON 文本保存在 `coordinates` 列。

use super::{PgStore, parse_tag};
use crate::error::StorageError;
use crate::models::{CableRouteFilter, CableRouteRecord, CableRouteUpdate};
use crate::traits::CableRouteStore;
use domain::{GeoPoint, now_epoch_ms};
use sqlx::Row;
use sqlx::postgres::PgRow;

const ROUTE_COLUMNS: &str = "route_id, name, description, start_point, end_point, coordinates, \
     status, cable_type, color, created_at_ms, updated_at_ms";

fn route_from_row(row: &PgRow) -> Result<CableRouteRecord, StorageError> {
    let coordinates: String = row.try_get("coordinates")?;
    let coordinates: Vec<GeoPoint> = serde_json::from_str(&coordinates)?;
    let status: String = row.try_get("status")?;
    let cable_type: String = row.try_get("cable_type")?;
    Ok(CableRouteRecord {
        route_id: row.try_get("route_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        start_point: row.try_get("start_point")?,
        end_point: row.try_get("end_point")?,
        coordinates,
        status: parse_tag(&status)?,
        cable_type: parse_tag(&cable_type)?,
        color: row.try_get("color")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl CableRouteStore for PgStore {
    async fn list_cable_routes(
        &self,
        filter: &CableRouteFilter,
    ) -> Result<Vec<CableRouteRecord>, StorageError> {
        let sql = format!(
            "select {ROUTE_COLUMNS} from cable_routes \
             where ($1::text is null or status = $1) and ($2::text is null or cable_type = $2) \
             order by name asc, route_id asc"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.status.map(|status| status.as_str()))
            .bind(filter.cable_type.map(|cable_type| cable_type.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(route_from_row).collect()
    }

    async fn find_cable_route(
        &self,
        route_id: &str,
    ) -> Result<Option<CableRouteRecord>, StorageError> {
        let sql = format!("select {ROUTE_COLUMNS} from cable_routes where route_id = $1");
        let row = sqlx::query(&sql)
            .bind(route_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(route_from_row(&row)?))
    }

    async fn create_cable_route(
        &self,
        record: CableRouteRecord,
    ) -> Result<CableRouteRecord, StorageError> {
        let coordinates = serde_json::to_string(&record.coordinates)?;
        sqlx::query(
            "insert into cable_routes (route_id, name, description, start_point, end_point, \
             coordinates, status, cable_type, color, created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&record.route_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.start_point)
        .bind(&record.end_point)
        .bind(coordinates)
        .bind(record.status.as_str())
        .bind(record.cable_type.as_str())
        .bind(&record.color)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_cable_route(
        &self,
        route_id: &str,
        update: CableRouteUpdate,
    ) -> Result<Option<CableRouteRecord>, StorageError> {
        let coordinates = serde_json::to_string(&update.coordinates)?;
        let sql = format!(
            "update cable_routes set name = $2, description = $3, start_point = $4, \
             end_point = $5, coordinates = $6, status = $7, cable_type = $8, color = $9, \
             updated_at_ms = $10 \
             where route_id = $1 returning {ROUTE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(route_id)
            .bind(&update.name)
            .bind(&update.description)
            .bind(&update.start_point)
            .bind(&update.end_point)
            .bind(coordinates)
            .bind(update.status.as_str())
            .bind(update.cable_type.as_str())
            .bind(&update.color)
            .bind(now_epoch_ms())
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(route_from_row(&row)?))
    }

    async fn delete_cable_route(&self, route_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from cable_routes where route_id = $1")
            .bind(route_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
