//! 光缆路由 CRUD handlers
//!
//! - GET /api/cable-routes - 按名称升序，可按 status、cableType 过滤
//! - POST /api/cable-routes - coordinates 至少两个点
//! - GET|PUT|DELETE /api/cable-routes/{id}

use crate::AppState;
use crate::utils::response::{cable_route_to_dto, inventory_error};
use crate::utils::{parse_json, parse_query};
use api_contract::{CableRouteDto, CableRoutePayload, CableRouteQuery, MessageDto};
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
pub struct CableRoutePath {
    route_id: String,
}

pub async fn list_cable_routes(
    State(state): State<AppState>,
    query: Result<Query<CableRouteQuery>, QueryRejection>,
) -> Response {
    let query = match parse_query(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match state.inventory.list_cable_routes(query).await {
        Ok(items) => {
            let data: Vec<CableRouteDto> = items.into_iter().map(cable_route_to_dto).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn create_cable_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    body: Result<Json<CableRoutePayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.create_cable_route(&ctx, payload).await {
        Ok(record) => (StatusCode::CREATED, Json(cable_route_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn get_cable_route(
    State(state): State<AppState>,
    Path(path): Path<CableRoutePath>,
) -> Response {
    match state.inventory.get_cable_route(&path.route_id).await {
        Ok(record) => (StatusCode::OK, Json(cable_route_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

/// 更新光缆路由，坐标整体替换
pub async fn update_cable_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<CableRoutePath>,
    body: Result<Json<CableRoutePayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.update_cable_route(&ctx, &path.route_id, payload).await {
        Ok(record) => (StatusCode::OK, Json(cable_route_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn delete_cable_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<CableRoutePath>,
) -> Response {
    match state.inventory.delete_cable_route(&ctx, &path.route_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageDto::new("Cable route deleted successfully")),
        )
            .into_response(),
        Err(err) => inventory_error(err),
    }
}
