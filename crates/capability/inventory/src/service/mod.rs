//! 资产服务：请求体校验、字段转换与持久化编排
//!
//! 每个实体的操作形状一致：
//! - list：按过滤条件列出（排序由存储层保证）
//! - get：不存在返回 NotFound
//! - create：先校验全部字段，再写入；唯一键冲突返回 Conflict
//! - update：与 create 相同的校验，整行替换
//! - delete：不存在返回 NotFound
//!
//! 所有失败在返回前统一计数并记录日志（见 `Tracked`）。

mod alarm;
mod cable_route;
mod dashboard;
mod odp;
mod olt;
mod ont;
mod settings;
mod user;

pub use dashboard::{DashboardSummary, DeviceCounts};
pub use olt::{OltDetail, OltNames};

use crate::error::InventoryError;
use domain::DeletePolicy;
use olt_storage::InventoryStore;
use olt_telemetry::{
    record_conflict, record_internal_failure, record_not_found, record_validation_failure,
};
use std::sync::Arc;
use tracing::{error, warn};

/// 仪表盘中“最近告警/最近 ONT”的条数。
pub const RECENT_LIMIT: usize = 5;

/// 资产规则中属于产品决策的部分，由配置注入。
#[derive(Debug, Clone)]
pub struct InventoryPolicy {
    /// ODP 未填写容量时的默认值（创建与更新一致）。
    pub odp_default_capacity: i32,
    /// 删除仍被引用的 OLT 时的策略。
    pub delete_policy: DeletePolicy,
}

impl Default for InventoryPolicy {
    fn default() -> Self {
        Self {
            odp_default_capacity: 8,
            delete_policy: DeletePolicy::Restrict,
        }
    }
}

/// 资产服务。
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
    policy: InventoryPolicy,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self::new_with_policy(store, InventoryPolicy::default())
    }

    pub fn new_with_policy(store: Arc<dyn InventoryStore>, policy: InventoryPolicy) -> Self {
        Self { store, policy }
    }

    pub(crate) fn store(&self) -> &dyn InventoryStore {
        self.store.as_ref()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 在返回前为失败计数并记录日志。
trait Tracked<T> {
    fn tracked(self, entity: &'static str, action: &'static str) -> Result<T, InventoryError>;
}

impl<T, E> Tracked<T> for Result<T, E>
where
    E: Into<InventoryError>,
{
    fn tracked(self, entity: &'static str, action: &'static str) -> Result<T, InventoryError> {
        self.map_err(|err| track(err.into(), entity, action))
    }
}

/// 校验、冲突、不存在属于调用方问题记 warn，内部错误记 error。
fn track(err: InventoryError, entity: &'static str, action: &'static str) -> InventoryError {
    match &err {
        InventoryError::Validation(fields) => {
            record_validation_failure();
            warn!(
                target: "olt.inventory",
                entity,
                action,
                field_count = fields.len(),
                error = %err,
                "validation_failed"
            );
        }
        InventoryError::Conflict(message) => {
            record_conflict();
            warn!(target: "olt.inventory", entity, action, error = %message, "conflict");
        }
        InventoryError::NotFound(message) => {
            record_not_found();
            warn!(target: "olt.inventory", entity, action, error = %message, "not_found");
        }
        InventoryError::Internal(message) => {
            record_internal_failure();
            error!(target: "olt.inventory", entity, action, error = %message, "internal_failure");
        }
    }
    err
}
