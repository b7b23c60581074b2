//! SmartOLT 资产管理服务入口。

use olt_api::{AppState, build_app, prepare_accounts};
use olt_auth::{AuthService, JwtManager};
use olt_config::AppConfig;
use olt_inventory::{InventoryPolicy, InventoryService};
use olt_storage::{InMemoryStore, InventoryStore, PgStore};
use olt_telemetry::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 配置了数据库则使用 Postgres（需先执行 migrations），否则使用内存存储
    let (store, storage): (Arc<dyn InventoryStore>, &'static str) = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            (Arc::new(store), "postgres")
        }
        None => (Arc::new(InMemoryStore::new()), "memory"),
    };

    let inventory = Arc::new(InventoryService::new_with_policy(
        store.clone(),
        InventoryPolicy {
            odp_default_capacity: config.odp_default_capacity,
            delete_policy: config.delete_policy,
        },
    ));
    prepare_accounts(&inventory, &config).await?;

    let jwt = JwtManager::new(
        config.jwt_secret.clone(),
        config.jwt_access_ttl_seconds,
        config.jwt_refresh_ttl_seconds,
    );
    let auth = Arc::new(AuthService::new(store, jwt));
    let app = build_app(AppState {
        inventory,
        auth,
        storage,
    });

    info!(addr = %config.http_addr, storage, "olt-api listening");
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
