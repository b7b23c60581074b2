//! ODP CRUD handlers
//!
//! 经纬度字段接受数字或数字字符串；未填写容量时使用配置的默认容量。

use crate::AppState;
use crate::utils::response::{inventory_error, odp_to_dto, with_olt_names};
use crate::utils::{parse_json, parse_query};
use api_contract::{MessageDto, OdpDto, OdpPayload, OdpQuery};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::SessionContext;

#[derive(serde::Deserialize)]
pub struct OdpPath {
    odp_id: String,
}

pub async fn list_odps(
    State(state): State<AppState>,
    query: Result<Query<OdpQuery>, QueryRejection>,
) -> Response {
    let query = match parse_query(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match state.inventory.list_odps(query).await {
        Ok(items) => {
            with_olt_names(&state, StatusCode::OK, |names| {
                items
                    .into_iter()
                    .map(|record| odp_to_dto(record, names))
                    .collect::<Vec<OdpDto>>()
            })
            .await
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn create_odp(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    body: Result<Json<OdpPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.create_odp(&ctx, payload).await {
        Ok(record) => {
            with_olt_names(&state, StatusCode::CREATED, |names| odp_to_dto(record, names)).await
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn get_odp(State(state): State<AppState>, Path(path): Path<OdpPath>) -> Response {
    match state.inventory.get_odp(&path.odp_id).await {
        Ok(record) => {
            with_olt_names(&state, StatusCode::OK, |names| odp_to_dto(record, names)).await
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn update_odp(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<OdpPath>,
    body: Result<Json<OdpPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.update_odp(&ctx, &path.odp_id, payload).await {
        Ok(record) => {
            with_olt_names(&state, StatusCode::OK, |names| odp_to_dto(record, names)).await
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn delete_odp(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<OdpPath>,
) -> Response {
    match state.inventory.delete_odp(&ctx, &path.odp_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageDto::new("ODP deleted successfully")),
        )
            .into_response(),
        Err(err) => inventory_error(err),
    }
}
