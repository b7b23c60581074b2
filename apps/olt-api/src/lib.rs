//! SmartOLT 资产管理 HTTP API
//!
//! - `routes`：路由表
//! - `handlers`：各资源的 HTTP 适配层，业务规则全部在资产服务中
//! - `middleware`：请求追踪 ID 与会话守卫
//! - `utils`：错误映射、请求体解析、Record → DTO 转换

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use axum::{Router, middleware as axum_middleware};
use olt_auth::Authenticator;
use olt_config::AppConfig;
use olt_inventory::{InventoryError, InventoryService, bootstrap_admin, seed_demo_data};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 应用状态：启动时显式构造，所有 handler 共享。
#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<InventoryService>,
    pub auth: Arc<dyn Authenticator>,
    /// 存储后端标识（`postgres` / `memory`），用于健康检查。
    pub storage: &'static str,
}

/// 组装完整应用：路由 + 会话守卫 + 请求追踪。
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::create_api_router(state.clone()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::request_context))
}

/// 启动时准备账户：按配置写入演示数据，再按配置创建首个管理员。
///
/// 两者都只在账户表为空时生效，对内存与 Postgres 存储行为一致。
pub async fn prepare_accounts(
    inventory: &InventoryService,
    config: &AppConfig,
) -> Result<(), InventoryError> {
    if config.seed_demo {
        let seeded = seed_demo_data(inventory).await?;
        info!(seeded, "demo data");
    }
    if let Some(admin) = &config.bootstrap_admin {
        let created = bootstrap_admin(inventory, &admin.email, &admin.password).await?;
        info!(created, email = %admin.email, "bootstrap admin");
    }
    Ok(())
}
