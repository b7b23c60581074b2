use super::{InventoryService, Tracked, new_id};
use crate::error::InventoryError;
use crate::validation::Checker;
use api_contract::{CableRoutePayload, CableRouteQuery};
use domain::{CableRouteStatus, CableType, SessionContext, now_epoch_ms};
use olt_storage::{CableRouteFilter, CableRouteRecord, CableRouteStore, CableRouteUpdate};
use olt_telemetry::{record_create, record_delete, record_update};
use tracing::info;

const ENTITY: &str = "cable_route";

pub(crate) fn cable_route_fields(
    payload: CableRoutePayload,
) -> Result<CableRouteUpdate, InventoryError> {
    let mut checker = Checker::new();
    let name = checker.required_text("name", payload.name);
    let description = checker.optional_text(payload.description).unwrap_or_default();
    let start_point = checker.required_text("startPoint", payload.start_point);
    let end_point = checker.required_text("endPoint", payload.end_point);
    let coordinates = checker.coordinates("coordinates", payload.coordinates);
    let status = checker.tag_or("status", payload.status, CableRouteStatus::Active);
    let cable_type = checker.tag_or("cableType", payload.cable_type, CableType::Fiber);
    let color = checker.color("color", payload.color);
    checker.finish()?;

    Ok(CableRouteUpdate {
        name,
        description,
        start_point,
        end_point,
        coordinates,
        status,
        cable_type,
        color,
    })
}

fn cable_route_filter(query: CableRouteQuery) -> Result<CableRouteFilter, InventoryError> {
    let mut checker = Checker::new();
    let status = checker.optional_tag("status", query.status);
    let cable_type = checker.optional_tag("cableType", query.cable_type);
    checker.finish()?;
    Ok(CableRouteFilter { status, cable_type })
}

fn cable_route_not_found() -> InventoryError {
    InventoryError::NotFound("Cable route not found".to_string())
}

impl InventoryService {
    /// 按名称升序列出光缆路由。
    pub async fn list_cable_routes(
        &self,
        query: CableRouteQuery,
    ) -> Result<Vec<CableRouteRecord>, InventoryError> {
        let filter = cable_route_filter(query).tracked(ENTITY, "list")?;
        self.store
            .list_cable_routes(&filter)
            .await
            .tracked(ENTITY, "list")
    }

    pub async fn get_cable_route(
        &self,
        route_id: &str,
    ) -> Result<CableRouteRecord, InventoryError> {
        self.store
            .find_cable_route(route_id)
            .await
            .tracked(ENTITY, "get")?
            .ok_or_else(cable_route_not_found)
            .tracked(ENTITY, "get")
    }

    pub async fn create_cable_route(
        &self,
        ctx: &SessionContext,
        payload: CableRoutePayload,
    ) -> Result<CableRouteRecord, InventoryError> {
        let fields = cable_route_fields(payload).tracked(ENTITY, "create")?;
        let record = CableRouteRecord::create(new_id(), fields, now_epoch_ms());
        let record = self
            .store
            .create_cable_route(record)
            .await
            .tracked(ENTITY, "create")?;
        record_create();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.route_id,
            user_id = %ctx.user_id,
            points = record.coordinates.len(),
            "cable_route_created"
        );
        Ok(record)
    }

    pub async fn update_cable_route(
        &self,
        ctx: &SessionContext,
        route_id: &str,
        payload: CableRoutePayload,
    ) -> Result<CableRouteRecord, InventoryError> {
        let fields = cable_route_fields(payload).tracked(ENTITY, "update")?;
        let record = self
            .store
            .update_cable_route(route_id, fields)
            .await
            .tracked(ENTITY, "update")?
            .ok_or_else(cable_route_not_found)
            .tracked(ENTITY, "update")?;
        record_update();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.route_id,
            user_id = %ctx.user_id,
            points = record.coordinates.len(),
            "cable_route_updated"
        );
        Ok(record)
    }

    pub async fn delete_cable_route(
        &self,
        ctx: &SessionContext,
        route_id: &str,
    ) -> Result<(), InventoryError> {
        let deleted = self
            .store
            .delete_cable_route(route_id)
            .await
            .tracked(ENTITY, "delete")?;
        if !deleted {
            return Err(cable_route_not_found()).tracked(ENTITY, "delete");
        }
        record_delete();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %route_id,
            user_id = %ctx.user_id,
            "cable_route_deleted"
        );
        Ok(())
    }
}
