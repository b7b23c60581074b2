//! 路由定义
//!
//! 集中管理所有 API 路由（统一挂在 `/api` 下）：
//! - 公开接口：/health, /login, /refresh-token
//! - 受保护接口（需 Bearer token）：
//!   - /metrics, /dashboard
//!   - /olts, /onts, /odps, /cable-routes, /alarms, /users（CRUD）
//!   - /alarms/{id}/resolve
//!   - /settings

use super::AppState;
use super::handlers::*;
use super::middleware::require_session;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

/// 创建 API 路由
///
/// 受保护路由统一经过 `require_session`，公开路由不经过。
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/metrics", get(get_metrics))
        .route("/dashboard", get(get_dashboard))
        .route("/olts", get(list_olts).post(create_olt))
        .route("/olts/:olt_id", get(get_olt).put(update_olt).delete(delete_olt))
        .route("/onts", get(list_onts).post(create_ont))
        .route("/onts/:ont_id", get(get_ont).put(update_ont).delete(delete_ont))
        .route("/odps", get(list_odps).post(create_odp))
        .route("/odps/:odp_id", get(get_odp).put(update_odp).delete(delete_odp))
        .route(
            "/cable-routes",
            get(list_cable_routes).post(create_cable_route),
        )
        .route(
            "/cable-routes/:route_id",
            get(get_cable_route)
                .put(update_cable_route)
                .delete(delete_cable_route),
        )
        .route("/alarms", get(list_alarms).post(create_alarm))
        .route(
            "/alarms/:alarm_id",
            get(get_alarm).put(update_alarm).delete(delete_alarm),
        )
        .route("/alarms/:alarm_id/resolve", post(resolve_alarm))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/settings",
            get(get_settings).post(save_settings).put(save_settings),
        )
        .route_layer(from_fn_with_state(state, require_session));

    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .merge(protected)
}
