//! 系统配置 handlers
//!
//! - GET /api/settings - 返回扁平的 key → value 映射
//! - POST|PUT /api/settings - 批量保存；数字与布尔值转为字符串保存

use crate::AppState;
use crate::utils::parse_json;
use crate::utils::response::inventory_error;
use api_contract::{SettingsPayload, SettingsSaveDto};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::SessionContext;

pub async fn get_settings(State(state): State<AppState>) -> Response {
    match state.inventory.get_settings().await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn save_settings(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    body: Result<Json<SettingsPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.save_settings(&ctx, payload).await {
        Ok(saved) => (StatusCode::OK, Json(SettingsSaveDto { saved })).into_response(),
        Err(err) => inventory_error(err),
    }
}
