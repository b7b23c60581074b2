//! 告警 handlers
//!
//! - GET /api/alarms - 按创建时间倒序，可按 status、severity、deviceType 过滤
//! - POST /api/alarms
//! - GET|PUT|DELETE /api/alarms/{id}
//! - POST /api/alarms/{id}/resolve - 标记已解决

use crate::AppState;
use crate::utils::response::{alarm_to_dto, inventory_error};
use crate::utils::{parse_json, parse_query};
use api_contract::{AlarmDto, AlarmPayload, AlarmQuery, MessageDto};
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
pub struct AlarmPath {
    alarm_id: String,
}

pub async fn list_alarms(
    State(state): State<AppState>,
    query: Result<Query<AlarmQuery>, QueryRejection>,
) -> Response {
    let query = match parse_query(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match state.inventory.list_alarms(query).await {
        Ok(items) => {
            let data: Vec<AlarmDto> = items.into_iter().map(alarm_to_dto).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn create_alarm(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    body: Result<Json<AlarmPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.create_alarm(&ctx, payload).await {
        Ok(record) => (StatusCode::CREATED, Json(alarm_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn get_alarm(State(state): State<AppState>, Path(path): Path<AlarmPath>) -> Response {
    match state.inventory.get_alarm(&path.alarm_id).await {
        Ok(record) => (StatusCode::OK, Json(alarm_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn update_alarm(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<AlarmPath>,
    body: Result<Json<AlarmPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.update_alarm(&ctx, &path.alarm_id, payload).await {
        Ok(record) => (StatusCode::OK, Json(alarm_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn delete_alarm(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<AlarmPath>,
) -> Response {
    match state.inventory.delete_alarm(&ctx, &path.alarm_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageDto::new("Alarm deleted successfully")),
        )
            .into_response(),
        Err(err) => inventory_error(err),
    }
}

/// 标记告警已解决
///
/// 重复调用返回同一条记录，解决时间保持第一次的值。
pub async fn resolve_alarm(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<AlarmPath>,
) -> Response {
    match state.inventory.resolve_alarm(&ctx, &path.alarm_id).await {
        Ok(record) => (StatusCode::OK, Json(alarm_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}
