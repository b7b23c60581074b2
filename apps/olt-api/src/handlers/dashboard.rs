//! 仪表盘汇总。
//!
//! - GET /api/dashboard

use crate::AppState;
use crate::utils::response::{dashboard_to_dto, inventory_error, with_olt_names};
use axum::{extract::State, http::StatusCode, response::Response};

pub async fn get_dashboard(State(state): State<AppState>) -> Response {
    match state.inventory.dashboard().await {
        Ok(summary) => {
            with_olt_names(&state, StatusCode::OK, |names| dashboard_to_dto(summary, names)).await
        }
        Err(err) => inventory_error(err),
    }
}
