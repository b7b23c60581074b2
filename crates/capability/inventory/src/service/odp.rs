use super::{InventoryService, Tracked, new_id};
use crate::error::InventoryError;
use crate::validation::Checker;
use api_contract::{OdpPayload, OdpQuery};
use domain::{OdpStatus, SessionContext, now_epoch_ms};
use olt_storage::{OdpFilter, OdpRecord, OdpStore, OdpUpdate};
use olt_telemetry::{record_create, record_delete, record_update};
use tracing::info;

const ENTITY: &str = "odp";

/// 未填写容量时使用 `default_capacity`，创建与更新一致。
pub(crate) fn odp_fields(
    payload: OdpPayload,
    default_capacity: i32,
) -> Result<OdpUpdate, InventoryError> {
    let mut checker = Checker::new();
    let name = checker.required_text("name", payload.name);
    let location = checker.required_text("location", payload.location);
    let latitude = checker.required_number("latitude", payload.latitude);
    let latitude = checker.latitude("latitude", Some(latitude)).unwrap_or_default();
    let longitude = checker.required_number("longitude", payload.longitude);
    let longitude = checker.longitude("longitude", Some(longitude)).unwrap_or_default();
    let capacity = checker.integer_or("capacity", payload.capacity, default_capacity, 1);
    let status = checker.tag_or("status", payload.status, OdpStatus::Active);
    let olt_id = checker.optional_text(payload.olt_id);
    checker.finish()?;

    Ok(OdpUpdate {
        name,
        location,
        latitude,
        longitude,
        capacity,
        status,
        olt_id,
    })
}

fn odp_filter(query: OdpQuery) -> Result<OdpFilter, InventoryError> {
    let mut checker = Checker::new();
    let olt_id = checker.optional_text(query.olt_id);
    let status = checker.optional_tag("status", query.status);
    checker.finish()?;
    Ok(OdpFilter { olt_id, status })
}

fn odp_not_found() -> InventoryError {
    InventoryError::NotFound("ODP not found".to_string())
}

impl InventoryService {
    /// 按创建时间倒序列出 ODP。
    pub async fn list_odps(&self, query: OdpQuery) -> Result<Vec<OdpRecord>, InventoryError> {
        let filter = odp_filter(query).tracked(ENTITY, "list")?;
        self.store.list_odps(&filter).await.tracked(ENTITY, "list")
    }

    pub async fn get_odp(&self, odp_id: &str) -> Result<OdpRecord, InventoryError> {
        self.store
            .find_odp(odp_id)
            .await
            .tracked(ENTITY, "get")?
            .ok_or_else(odp_not_found)
            .tracked(ENTITY, "get")
    }

    pub async fn create_odp(
        &self,
        ctx: &SessionContext,
        payload: OdpPayload,
    ) -> Result<OdpRecord, InventoryError> {
        let fields =
            odp_fields(payload, self.policy.odp_default_capacity).tracked(ENTITY, "create")?;
        let record = OdpRecord::create(new_id(), fields, now_epoch_ms());
        let record = self
            .store
            .create_odp(record)
            .await
            .tracked(ENTITY, "create")?;
        record_create();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.odp_id,
            user_id = %ctx.user_id,
            olt_id = ?record.olt_id,
            "odp_created"
        );
        Ok(record)
    }

    pub async fn update_odp(
        &self,
        ctx: &SessionContext,
        odp_id: &str,
        payload: OdpPayload,
    ) -> Result<OdpRecord, InventoryError> {
        let fields =
            odp_fields(payload, self.policy.odp_default_capacity).tracked(ENTITY, "update")?;
        let record = self
            .store
            .update_odp(odp_id, fields)
            .await
            .tracked(ENTITY, "update")?
            .ok_or_else(odp_not_found)
            .tracked(ENTITY, "update")?;
        record_update();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.odp_id,
            user_id = %ctx.user_id,
            "odp_updated"
        );
        Ok(record)
    }

    pub async fn delete_odp(
        &self,
        ctx: &SessionContext,
        odp_id: &str,
    ) -> Result<(), InventoryError> {
        let deleted = self
            .store
            .delete_odp(odp_id)
            .await
            .tracked(ENTITY, "delete")?;
        if !deleted {
            return Err(odp_not_found()).tracked(ENTITY, "delete");
        }
        record_delete();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %odp_id,
            user_id = %ctx.user_id,
            "odp_deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(latitude: serde_json::Value) -> OdpPayload {
        OdpPayload {
            name: Some("ODP - Sudirman".to_string()),
            location: Some("Sudirman, Jakarta".to_string()),
            latitude: Some(latitude),
            longitude: Some(json!("106.85")),
            ..OdpPayload::default()
        }
    }

    #[test]
    fn latitude_out_of_range_is_rejected() {
        let err = odp_fields(payload(json!(95)), 8).expect_err("out of range");
        let InventoryError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "latitude");
        assert_eq!(fields[0].message, "latitude must be between -90 and 90");
    }

    #[test]
    fn default_capacity_comes_from_policy() {
        let fields = odp_fields(payload(json!(-6.2088)), 24).expect("valid");
        assert_eq!(fields.capacity, 24);
        assert_eq!(fields.latitude, -6.2088);
        assert_eq!(fields.longitude, 106.85);
        assert_eq!(fields.status, OdpStatus::Active);
    }

    #[test]
    fn missing_coordinates_are_required() {
        let err = odp_fields(
            OdpPayload {
                name: Some("ODP".to_string()),
                location: Some("Somewhere".to_string()),
                ..OdpPayload::default()
            },
            8,
        )
        .expect_err("missing");
        let InventoryError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].message, "latitude is required");
    }
}
