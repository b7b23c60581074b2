use super::{InventoryService, Tracked, new_id};
use crate::error::InventoryError;
use crate::validation::Checker;
use api_contract::{OntPayload, OntQuery};
use domain::{OntStatus, SessionContext, now_epoch_ms};
use olt_storage::{OntFilter, OntRecord, OntStore, OntUpdate};
use olt_telemetry::{record_create, record_delete, record_update};
use tracing::info;

const ENTITY: &str = "ont";

pub(crate) fn ont_fields(payload: OntPayload) -> Result<OntUpdate, InventoryError> {
    let mut checker = Checker::new();
    let serial_number = checker.required_text("serialNumber", payload.serial_number);
    let mac_address = checker.mac_address("macAddress", payload.mac_address);
    let olt_id = checker.required_text("oltId", payload.olt_id);
    let port = checker.required_integer("port", payload.port, 1);
    let status = checker.tag_or("status", payload.status, OntStatus::Pending);
    let signal_strength = checker.optional_number("signalStrength", payload.signal_strength);
    let rx_power = checker.optional_number("rxPower", payload.rx_power);
    let tx_power = checker.optional_number("txPower", payload.tx_power);
    let distance = checker.optional_number("distance", payload.distance);
    if distance.is_some_and(|distance| distance < 0.0) {
        checker.push("distance", "distance must not be negative");
    }
    let customer_name = checker.optional_text(payload.customer_name);
    let customer_phone = checker.optional_text(payload.customer_phone);
    let customer_email = checker.optional_email("customerEmail", payload.customer_email);
    let address = checker.optional_text(payload.address);
    let service_package = checker.optional_text(payload.service_package);
    let install_date = checker.date("installDate", payload.install_date);
    let notes = checker.optional_text(payload.notes);
    checker.finish()?;

    Ok(OntUpdate {
        serial_number,
        mac_address,
        olt_id,
        port,
        status,
        signal_strength,
        rx_power,
        tx_power,
        distance,
        customer_name,
        customer_phone,
        customer_email,
        address,
        service_package,
        install_date,
        notes,
    })
}

fn ont_filter(query: OntQuery) -> Result<OntFilter, InventoryError> {
    let mut checker = Checker::new();
    let olt_id = checker.optional_text(query.olt_id);
    let status = checker.optional_tag("status", query.status);
    checker.finish()?;
    Ok(OntFilter { olt_id, status })
}

fn ont_not_found() -> InventoryError {
    InventoryError::NotFound("ONT not found".to_string())
}

impl InventoryService {
    /// 按创建时间倒序列出 ONT。
    pub async fn list_onts(&self, query: OntQuery) -> Result<Vec<OntRecord>, InventoryError> {
        let filter = ont_filter(query).tracked(ENTITY, "list")?;
        self.store.list_onts(&filter).await.tracked(ENTITY, "list")
    }

    pub async fn get_ont(&self, ont_id: &str) -> Result<OntRecord, InventoryError> {
        self.store
            .find_ont(ont_id)
            .await
            .tracked(ENTITY, "get")?
            .ok_or_else(ont_not_found)
            .tracked(ENTITY, "get")
    }

    /// 创建 ONT。所属 OLT 不存在时返回 NotFound。
    pub async fn create_ont(
        &self,
        ctx: &SessionContext,
        payload: OntPayload,
    ) -> Result<OntRecord, InventoryError> {
        let fields = ont_fields(payload).tracked(ENTITY, "create")?;
        let record = OntRecord::create(new_id(), fields, now_epoch_ms());
        let record = self
            .store
            .create_ont(record)
            .await
            .tracked(ENTITY, "create")?;
        record_create();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.ont_id,
            user_id = %ctx.user_id,
            olt_id = %record.olt_id,
            serial_number = %record.serial_number,
            "ont_created"
        );
        Ok(record)
    }

    pub async fn update_ont(
        &self,
        ctx: &SessionContext,
        ont_id: &str,
        payload: OntPayload,
    ) -> Result<OntRecord, InventoryError> {
        let fields = ont_fields(payload).tracked(ENTITY, "update")?;
        let record = self
            .store
            .update_ont(ont_id, fields)
            .await
            .tracked(ENTITY, "update")?
            .ok_or_else(ont_not_found)
            .tracked(ENTITY, "update")?;
        record_update();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.ont_id,
            user_id = %ctx.user_id,
            "ont_updated"
        );
        Ok(record)
    }

    pub async fn delete_ont(
        &self,
        ctx: &SessionContext,
        ont_id: &str,
    ) -> Result<(), InventoryError> {
        let deleted = self
            .store
            .delete_ont(ont_id)
            .await
            .tracked(ENTITY, "delete")?;
        if !deleted {
            return Err(ont_not_found()).tracked(ENTITY, "delete");
        }
        record_delete();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %ont_id,
            user_id = %ctx.user_id,
            "ont_deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn coerces_strings_and_normalizes_mac() {
        let fields = ont_fields(OntPayload {
            serial_number: Some(" HWTC12345678 ".to_string()),
            mac_address: Some("00-11-22-aa-bb-cc".to_string()),
            olt_id: Some("olt-1".to_string()),
            port: Some(json!("3")),
            rx_power: Some(json!("-19.2")),
            install_date: Some("2024-01-15".to_string()),
            ..OntPayload::default()
        })
        .expect("valid");
        assert_eq!(fields.serial_number, "HWTC12345678");
        assert_eq!(fields.mac_address.as_deref(), Some("00-11-22-AA-BB-CC"));
        assert_eq!(fields.port, 3);
        assert_eq!(fields.rx_power, Some(-19.2));
        assert_eq!(fields.status, OntStatus::Pending);
        assert_eq!(fields.install_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn rejects_bad_port_and_email() {
        let err = ont_fields(OntPayload {
            serial_number: Some("HWTC12345678".to_string()),
            olt_id: Some("olt-1".to_string()),
            port: Some(json!("abc")),
            customer_email: Some("not-an-email".to_string()),
            ..OntPayload::default()
        })
        .expect_err("invalid");
        let InventoryError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "port");
        assert_eq!(fields[1].field, "customerEmail");
    }
}
