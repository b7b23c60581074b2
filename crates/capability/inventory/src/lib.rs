//! 网络资产能力：请求体校验、数值转换与各实体的 CRUD 编排。
//!
//! 服务层只依赖 `olt_storage::InventoryStore`，由进程启动时显式构造并注入。

mod error;
mod seed;
mod service;
pub mod validation;

pub use error::{FieldError, InventoryError};
pub use seed::{DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, bootstrap_admin, seed_demo_data};
pub use service::{
    DashboardSummary, DeviceCounts, InventoryPolicy, InventoryService, OltDetail, OltNames,
    RECENT_LIMIT,
};
