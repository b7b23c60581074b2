//! OLT CRUD handlers
//!
//! 提供 OLT 资源的增删改查接口：
//! - GET /api/olts - 列出 OLT（可按 status 过滤，按名称升序）
//! - POST /api/olts - 创建 OLT
//! - GET /api/olts/{id} - 获取 OLT 详情
//! - PUT /api/olts/{id} - 整行替换更新
//! - DELETE /api/olts/{id} - 删除 OLT（仍被引用时按删除策略处理）
//!
//! 所有接口都在会话守卫之后，字段校验由资产服务完成。

use crate::AppState;
use crate::utils::response::{inventory_error, olt_detail_to_dto, olt_to_dto};
use crate::utils::{parse_json, parse_query};
use api_contract::{MessageDto, OltDto, OltPayload, OltQuery};
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
pub struct OltPath {
    olt_id: String,
}

/// 列出 OLT
pub async fn list_olts(
    State(state): State<AppState>,
    query: Result<Query<OltQuery>, QueryRejection>,
) -> Response {
    let query = match parse_query(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match state.inventory.list_olts(query).await {
        Ok(items) => {
            let data: Vec<OltDto> = items.into_iter().map(olt_to_dto).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

/// 创建 OLT
///
/// 必填 name、ipAddress、model、vendor、location；ipAddress 重复返回 409。
pub async fn create_olt(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    body: Result<Json<OltPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.create_olt(&ctx, payload).await {
        Ok(record) => (StatusCode::CREATED, Json(olt_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

/// 获取 OLT 详情（附带下挂 ONT/ODP 数量）
pub async fn get_olt(State(state): State<AppState>, Path(path): Path<OltPath>) -> Response {
    match state.inventory.get_olt_detail(&path.olt_id).await {
        Ok(detail) => (StatusCode::OK, Json(olt_detail_to_dto(detail))).into_response(),
        Err(err) => inventory_error(err),
    }
}

/// 更新 OLT（整行替换，未提供的可选字段被清空）
pub async fn update_olt(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<OltPath>,
    body: Result<Json<OltPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.update_olt(&ctx, &path.olt_id, payload).await {
        Ok(record) => (StatusCode::OK, Json(olt_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

/// 删除 OLT
///
/// restrict 策略下仍有 ONT/ODP 引用时返回 409；cascade 策略下一并删除。
pub async fn delete_olt(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<OltPath>,
) -> Response {
    match state.inventory.delete_olt(&ctx, &path.olt_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageDto::new("OLT deleted successfully")),
        )
            .into_response(),
        Err(err) => inventory_error(err),
    }
}
