use super::{InventoryService, Tracked, new_id};
use crate::error::InventoryError;
use crate::validation::Checker;
use api_contract::{OltPayload, OltQuery};
use domain::{OltStatus, SessionContext, now_epoch_ms};
use olt_storage::{OltDependents, OltFilter, OltRecord, OltStore, OltUpdate};
use std::collections::HashMap;
use olt_telemetry::{record_create, record_delete, record_update};
use tracing::info;

const ENTITY: &str = "olt";
/// 未填写端口数时的默认值。
pub const DEFAULT_TOTAL_PORTS: i32 = 16;

pub(crate) fn olt_fields(payload: OltPayload) -> Result<OltUpdate, InventoryError> {
    let mut checker = Checker::new();
    let name = checker.required_text("name", payload.name);
    let ip_address = checker.ip_address("ipAddress", payload.ip_address);
    let model = checker.required_text("model", payload.model);
    let vendor = checker.required_text("vendor", payload.vendor);
    let location = checker.required_text("location", payload.location);
    let status = checker.tag_or("status", payload.status, OltStatus::Offline);
    let firmware_version = checker.optional_text(payload.firmware_version);
    let total_ports = checker.integer_or("totalPorts", payload.total_ports, DEFAULT_TOTAL_PORTS, 1);
    let latitude = checker.optional_number("latitude", payload.latitude);
    let latitude = checker.latitude("latitude", latitude);
    let longitude = checker.optional_number("longitude", payload.longitude);
    let longitude = checker.longitude("longitude", longitude);
    let description = checker.optional_text(payload.description);
    checker.finish()?;

    Ok(OltUpdate {
        name,
        ip_address,
        model,
        vendor,
        location,
        status,
        firmware_version,
        total_ports,
        latitude,
        longitude,
        description,
    })
}

fn olt_filter(query: OltQuery) -> Result<OltFilter, InventoryError> {
    let mut checker = Checker::new();
    let status = checker.optional_tag("status", query.status);
    checker.finish()?;
    Ok(OltFilter { status })
}

/// OLT 标识到名称的映射，用于在 ONT/ODP 上标注所属 OLT。
pub type OltNames = HashMap<String, String>;

/// 单个 OLT 及其下挂的 ONT/ODP 数量。
#[derive(Debug, Clone)]
pub struct OltDetail {
    pub olt: OltRecord,
    pub dependents: OltDependents,
}

fn olt_not_found() -> InventoryError {
    InventoryError::NotFound("OLT not found".to_string())
}

impl InventoryService {
    /// 按名称升序列出 OLT。
    pub async fn list_olts(&self, query: OltQuery) -> Result<Vec<OltRecord>, InventoryError> {
        let filter = olt_filter(query).tracked(ENTITY, "list")?;
        self.store.list_olts(&filter).await.tracked(ENTITY, "list")
    }

    pub async fn get_olt(&self, olt_id: &str) -> Result<OltRecord, InventoryError> {
        self.store
            .find_olt(olt_id)
            .await
            .tracked(ENTITY, "get")?
            .ok_or_else(olt_not_found)
            .tracked(ENTITY, "get")
    }

    pub async fn get_olt_detail(&self, olt_id: &str) -> Result<OltDetail, InventoryError> {
        let olt = self.get_olt(olt_id).await?;
        let dependents = self
            .store
            .count_olt_dependents(&olt.olt_id)
            .await
            .tracked(ENTITY, "get")?;
        Ok(OltDetail { olt, dependents })
    }

    pub async fn olt_names(&self) -> Result<OltNames, InventoryError> {
        let olts = self
            .store
            .list_olts(&OltFilter::default())
            .await
            .tracked(ENTITY, "list")?;
        Ok(olts.into_iter().map(|olt| (olt.olt_id, olt.name)).collect())
    }

    pub async fn create_olt(
        &self,
        ctx: &SessionContext,
        payload: OltPayload,
    ) -> Result<OltRecord, InventoryError> {
        let fields = olt_fields(payload).tracked(ENTITY, "create")?;
        let record = OltRecord::create(new_id(), fields, now_epoch_ms());
        let record = self
            .store
            .create_olt(record)
            .await
            .tracked(ENTITY, "create")?;
        record_create();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.olt_id,
            user_id = %ctx.user_id,
            ip_address = %record.ip_address,
            "olt_created"
        );
        Ok(record)
    }

    /// 整行替换：未提供的字段回落到默认值而不是旧值。
    pub async fn update_olt(
        &self,
        ctx: &SessionContext,
        olt_id: &str,
        payload: OltPayload,
    ) -> Result<OltRecord, InventoryError> {
        let fields = olt_fields(payload).tracked(ENTITY, "update")?;
        let record = self
            .store
            .update_olt(olt_id, fields)
            .await
            .tracked(ENTITY, "update")?
            .ok_or_else(olt_not_found)
            .tracked(ENTITY, "update")?;
        record_update();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.olt_id,
            user_id = %ctx.user_id,
            "olt_updated"
        );
        Ok(record)
    }

    /// 删除 OLT。仍有 ONT/ODP 引用时按配置的策略拒绝或级联删除。
    pub async fn delete_olt(
        &self,
        ctx: &SessionContext,
        olt_id: &str,
    ) -> Result<(), InventoryError> {
        let policy = self.policy.delete_policy;
        let deleted = self
            .store
            .delete_olt(olt_id, policy)
            .await
            .tracked(ENTITY, "delete")?;
        if !deleted {
            return Err(olt_not_found()).tracked(ENTITY, "delete");
        }
        record_delete();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %olt_id,
            user_id = %ctx.user_id,
            policy = %policy,
            "olt_deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> OltPayload {
        OltPayload {
            name: Some("OLT-Jakarta-01".to_string()),
            ip_address: Some("192.168.1.100".to_string()),
            model: Some("OLT-8000".to_string()),
            vendor: Some("Huawei".to_string()),
            location: Some("Jakarta Pusat".to_string()),
            ..OltPayload::default()
        }
    }

    #[test]
    fn defaults_apply_to_omitted_fields() {
        let fields = olt_fields(payload()).expect("valid");
        assert_eq!(fields.status, OltStatus::Offline);
        assert_eq!(fields.total_ports, DEFAULT_TOTAL_PORTS);
        assert_eq!(fields.latitude, None);
    }

    #[test]
    fn reports_every_bad_field() {
        let err = olt_fields(OltPayload {
            ip_address: Some("999.1.1.1".to_string()),
            total_ports: Some(json!("zero")),
            latitude: Some(json!(120)),
            ..OltPayload::default()
        })
        .expect_err("invalid");
        let InventoryError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<&str> = fields.iter().map(|field| field.field.as_str()).collect();
        assert_eq!(
            names,
            ["name", "ipAddress", "model", "vendor", "location", "totalPorts", "latitude"]
        );
    }
}
