//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定（`$1`, `$2` 等）
//! 2. **单一连接池**：`PgStore` 持有一个 `PgPool`，同时实现全部存储 Trait
//! 3. **约束兜底**：唯一键与外键由数据库约束保证，违例映射为 `StorageErrorKind`
//!
//! ## 包含的实现
//!
//! - **UserStore** (`user.rs`)
//! - **OltStore** (`olt.rs`)：删除时在事务内统计、级联
//! - **OntStore** (`ont.rs`)
//! - **OdpStore** (`odp.rs`)
//! - **CableRouteStore** (`cable_route.rs`)：坐标以 JSON 文本存储
//! - **AlarmStore** (`alarm.rs`)
//! - **SystemConfigStore** (`system_config.rs`)
//!
//! ## 数据库模式
//!
//! 表结构见仓库根目录 `migrations/0001_inventory.sql`：
//! `users`、`olts`、`onts`、`odps`、`cable_routes`、`alarms`、`system_configs`。
//!
//! 时间戳统一存为 `bigint` 毫秒，状态与分类存为规范写法的 `text`。
//! 列表过滤使用 `($n::text is null or col = $n)`，未给出条件时不过滤。

mod alarm;
mod cable_route;
mod odp;
mod olt;
mod ont;
mod system_config;
mod user;

use crate::error::StorageError;
use domain::UnknownTag;
use sqlx::PgPool;
use std::str::FromStr;

/// PostgreSQL 存储
pub struct PgStore {
    pub pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 通过数据库 URL 建立连接池
    ///
    /// # 参数
    /// - `database_url`：Postgres 连接字符串
    /// - `max_connections`：连接池上限
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url, max_connections).await?;
        Ok(Self { pool })
    }
}

/// 解析 text 列中的标签值；库中出现未知值视为数据损坏。
fn parse_tag<T>(raw: &str) -> Result<T, StorageError>
where
    T: FromStr<Err = UnknownTag>,
{
    raw.parse()
        .map_err(|err: UnknownTag| StorageError::new(format!("corrupt column: {err}")))
}
