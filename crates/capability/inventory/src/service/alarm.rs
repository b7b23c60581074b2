use super::{InventoryService, Tracked, new_id};
use crate::error::InventoryError;
use crate::validation::Checker;
use api_contract::{AlarmPayload, AlarmQuery};
use domain::{AlarmSeverity, AlarmStatus, DeviceType, SessionContext, now_epoch_ms};
use olt_storage::{AlarmFilter, AlarmRecord, AlarmStore, AlarmUpdate};
use olt_telemetry::{record_create, record_delete, record_update};
use tracing::{info, warn};

const ENTITY: &str = "alarm";

pub(crate) fn alarm_fields(payload: AlarmPayload) -> Result<AlarmUpdate, InventoryError> {
    let mut checker = Checker::new();
    let device_type = checker.required_tag("deviceType", payload.device_type, DeviceType::Olt);
    let olt_id = checker.optional_text(payload.olt_id);
    let ont_id = checker.optional_text(payload.ont_id);
    let severity = checker.required_tag("severity", payload.severity, AlarmSeverity::Info);
    let message = checker.required_text("message", payload.message);
    let description = checker.optional_text(payload.description);
    let status = checker.tag_or("status", payload.status, AlarmStatus::Active);
    checker.finish()?;

    Ok(AlarmUpdate {
        device_type,
        olt_id,
        ont_id,
        severity,
        message,
        description,
        status,
    })
}

/// 告警应当只关联 OLT 或 ONT 之一；不强制，只记录告警日志。
fn warn_on_ambiguous_source(fields: &AlarmUpdate) {
    if fields.olt_id.is_some() == fields.ont_id.is_some() {
        warn!(
            target: "olt.inventory",
            entity = ENTITY,
            device_type = %fields.device_type,
            olt_id = ?fields.olt_id,
            ont_id = ?fields.ont_id,
            "alarm_source_ambiguous"
        );
    }
}

fn alarm_filter(query: AlarmQuery) -> Result<AlarmFilter, InventoryError> {
    let mut checker = Checker::new();
    let status = checker.optional_tag("status", query.status);
    let severity = checker.optional_tag("severity", query.severity);
    let device_type = checker.optional_tag("deviceType", query.device_type);
    checker.finish()?;
    Ok(AlarmFilter {
        status,
        severity,
        device_type,
    })
}

fn alarm_not_found() -> InventoryError {
    InventoryError::NotFound("Alarm not found".to_string())
}

impl InventoryService {
    /// 按创建时间倒序列出告警。
    pub async fn list_alarms(&self, query: AlarmQuery) -> Result<Vec<AlarmRecord>, InventoryError> {
        let filter = alarm_filter(query).tracked(ENTITY, "list")?;
        self.store.list_alarms(&filter).await.tracked(ENTITY, "list")
    }

    pub async fn get_alarm(&self, alarm_id: &str) -> Result<AlarmRecord, InventoryError> {
        self.store
            .find_alarm(alarm_id)
            .await
            .tracked(ENTITY, "get")?
            .ok_or_else(alarm_not_found)
            .tracked(ENTITY, "get")
    }

    pub async fn create_alarm(
        &self,
        ctx: &SessionContext,
        payload: AlarmPayload,
    ) -> Result<AlarmRecord, InventoryError> {
        let fields = alarm_fields(payload).tracked(ENTITY, "create")?;
        warn_on_ambiguous_source(&fields);
        let record = AlarmRecord::create(new_id(), fields, now_epoch_ms());
        let record = self
            .store
            .create_alarm(record)
            .await
            .tracked(ENTITY, "create")?;
        record_create();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.alarm_id,
            user_id = %ctx.user_id,
            severity = %record.severity,
            "alarm_created"
        );
        Ok(record)
    }

    /// 整行替换。状态改为 RESOLVED 时记录解决时间，改回 ACTIVE 时清空。
    pub async fn update_alarm(
        &self,
        ctx: &SessionContext,
        alarm_id: &str,
        payload: AlarmPayload,
    ) -> Result<AlarmRecord, InventoryError> {
        let fields = alarm_fields(payload).tracked(ENTITY, "update")?;
        warn_on_ambiguous_source(&fields);
        let record = self
            .store
            .update_alarm(alarm_id, fields)
            .await
            .tracked(ENTITY, "update")?
            .ok_or_else(alarm_not_found)
            .tracked(ENTITY, "update")?;
        record_update();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.alarm_id,
            user_id = %ctx.user_id,
            status = %record.status,
            "alarm_updated"
        );
        Ok(record)
    }

    /// 标记告警已解决。重复调用保留第一次的解决时间。
    pub async fn resolve_alarm(
        &self,
        ctx: &SessionContext,
        alarm_id: &str,
    ) -> Result<AlarmRecord, InventoryError> {
        let record = self
            .store
            .resolve_alarm(alarm_id, now_epoch_ms())
            .await
            .tracked(ENTITY, "resolve")?
            .ok_or_else(alarm_not_found)
            .tracked(ENTITY, "resolve")?;
        record_update();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.alarm_id,
            user_id = %ctx.user_id,
            resolved_at_ms = ?record.resolved_at_ms,
            "alarm_resolved"
        );
        Ok(record)
    }

    pub async fn delete_alarm(
        &self,
        ctx: &SessionContext,
        alarm_id: &str,
    ) -> Result<(), InventoryError> {
        let deleted = self
            .store
            .delete_alarm(alarm_id)
            .await
            .tracked(ENTITY, "delete")?;
        if !deleted {
            return Err(alarm_not_found()).tracked(ENTITY, "delete");
        }
        record_delete();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %alarm_id,
            user_id = %ctx.user_id,
            "alarm_deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_and_severity_are_required() {
        let err = alarm_fields(AlarmPayload {
            message: Some("Signal degraded".to_string()),
            ..AlarmPayload::default()
        })
        .expect_err("missing tags");
        let InventoryError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<&str> = fields.iter().map(|field| field.field.as_str()).collect();
        assert_eq!(names, ["deviceType", "severity"]);
    }

    #[test]
    fn status_defaults_to_active() {
        let fields = alarm_fields(AlarmPayload {
            device_type: Some("ont".to_string()),
            ont_id: Some("ont-1".to_string()),
            severity: Some("warning".to_string()),
            message: Some("Signal degraded".to_string()),
            ..AlarmPayload::default()
        })
        .expect("valid");
        assert_eq!(fields.device_type, DeviceType::Ont);
        assert_eq!(fields.severity, AlarmSeverity::Warning);
        assert_eq!(fields.status, AlarmStatus::Active);
    }
}
