//! ONT CRUD handlers
//!
//! - GET /api/onts - 列出 ONT（可按 oltId、status 过滤，按创建时间倒序）
//! - POST /api/onts - 创建 ONT（所属 OLT 必须存在，否则 404）
//! - GET /api/onts/{id}
//! - PUT /api/onts/{id}
//! - DELETE /api/onts/{id}

use crate::AppState;
use crate::utils::response::{inventory_error, ont_to_dto, with_olt_names};
use crate::utils::{parse_json, parse_query};
use api_contract::{MessageDto, OntDto, OntPayload, OntQuery};
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
pub struct OntPath {
    ont_id: String,
}

pub async fn list_onts(
    State(state): State<AppState>,
    query: Result<Query<OntQuery>, QueryRejection>,
) -> Response {
    let query = match parse_query(query) {
        Ok(query) => query,
        Err(response) => return response,
    };
    match state.inventory.list_onts(query).await {
        Ok(items) => {
            with_olt_names(&state, StatusCode::OK, |names| {
                items
                    .into_iter()
                    .map(|record| ont_to_dto(record, names))
                    .collect::<Vec<OntDto>>()
            })
            .await
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn create_ont(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    body: Result<Json<OntPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.create_ont(&ctx, payload).await {
        Ok(record) => {
            with_olt_names(&state, StatusCode::CREATED, |names| ont_to_dto(record, names)).await
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn get_ont(State(state): State<AppState>, Path(path): Path<OntPath>) -> Response {
    match state.inventory.get_ont(&path.ont_id).await {
        Ok(record) => {
            with_olt_names(&state, StatusCode::OK, |names| ont_to_dto(record, names)).await
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn update_ont(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<OntPath>,
    body: Result<Json<OntPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_json(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match state.inventory.update_ont(&ctx, &path.ont_id, payload).await {
        Ok(record) => {
            with_olt_names(&state, StatusCode::OK, |names| ont_to_dto(record, names)).await
        }
        Err(err) => inventory_error(err),
    }
}

pub async fn delete_ont(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(path): Path<OntPath>,
) -> Response {
    match state.inventory.delete_ont(&ctx, &path.ont_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageDto::new("ONT deleted successfully")),
        )
            .into_response(),
        Err(err) => inventory_error(err),
    }
}
