//! 用户管理 handlers
//!
//! 返回结构不含口令哈希。更新时 password 为空表示保留原口令。

use crate::AppState;
use crate::utils::response::{inventory_error, user_to_dto};
use crate::utils::{parse_json, parse_query};
use api_contract::{MessageDto, UserDto, UserPayload, UserQuery};
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
pub struct UserPath {
    user_id: String,
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Response {
    let query = match parse_query(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match state.inventory.list_users(query).await {
        Ok(items) => {
            let data: Vec<UserDto> = items.into_iter().map(user_to_dto).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(err) => inventory_error(err),
    }
}

/// 创建用户
///
/// 邮箱统一转小写保存；邮箱重复返回 409。
pub async fn create_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.create_user(&ctx, payload).await {
        Ok(record) => (StatusCode::CREATED, Json(user_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn get_user(State(state): State<AppState>, Path(path): Path<UserPath>) -> Response {
    match state.inventory.get_user(&path.user_id).await {
        Ok(record) => (StatusCode::OK, Json(user_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<UserPath>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.update_user(&ctx, &path.user_id, payload).await {
        Ok(record) => (StatusCode::OK, Json(user_to_dto(record))).into_response(),
        Err(err) => inventory_error(err),
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<UserPath>,
) -> Response {
    match state.inventory.delete_user(&ctx, &path.user_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageDto::new("User deleted successfully")),
        )
            .into_response(),
        Err(err) => inventory_error(err),
    }
}
