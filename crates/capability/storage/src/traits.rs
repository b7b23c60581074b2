//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - UserStore：操作员账户
//! - OltStore / OntStore / OdpStore：接入网设备
//! - CableRouteStore：光缆路由
//! - AlarmStore：告警
//! - SystemConfigStore：键值配置
//! - InventoryStore：以上全部能力的组合，供服务层注入
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 查找返回 `Option`，更新返回 `Option`（不存在为 None），删除返回 `bool`
//! - 唯一键冲突由存储层报告为 `StorageErrorKind::Conflict`
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{
    AlarmFilter, AlarmRecord, AlarmUpdate, CableRouteFilter, CableRouteRecord, CableRouteUpdate,
    OdpFilter, OdpRecord, OdpUpdate, OltDependents, OltFilter, OltRecord, OltUpdate, OntFilter,
    OntRecord, OntUpdate, SystemConfigRecord, UserFilter, UserRecord, UserUpdate,
};
use async_trait::async_trait;
use domain::DeletePolicy;

/// 用户存储接口
///
/// 提供账户 CRUD 以及登录相关的最后登录时间、refresh token 绑定。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 按创建时间倒序列出用户
    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserRecord>, StorageError>;

    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 根据邮箱查找用户（邮箱已规范化为小写）
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError>;

    async fn update_user(
        &self,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<Option<UserRecord>, StorageError>;

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError>;

    /// 记录最后登录时间
    async fn touch_last_login(&self, user_id: &str, at_ms: i64) -> Result<bool, StorageError>;

    /// 绑定当前有效的 refresh token jti（None 表示解绑）
    async fn set_refresh_jti(
        &self,
        user_id: &str,
        jti: Option<&str>,
    ) -> Result<bool, StorageError>;

    /// 仅当当前绑定仍是 `expected` 时改绑为 `next`，返回是否改绑成功。
    ///
    /// 比较与写入是一次原子操作，同一个 refresh token 并发兑换时只有一个成功。
    async fn rotate_refresh_jti(
        &self,
        user_id: &str,
        expected: &str,
        next: &str,
    ) -> Result<bool, StorageError>;
}

/// OLT 存储接口
#[async_trait]
pub trait OltStore: Send + Sync {
    /// 按名称升序列出 OLT
    async fn list_olts(&self, filter: &OltFilter) -> Result<Vec<OltRecord>, StorageError>;

    async fn find_olt(&self, olt_id: &str) -> Result<Option<OltRecord>, StorageError>;

    async fn create_olt(&self, record: OltRecord) -> Result<OltRecord, StorageError>;

    async fn update_olt(
        &self,
        olt_id: &str,
        update: OltUpdate,
    ) -> Result<Option<OltRecord>, StorageError>;

    /// 统计仍引用该 OLT 的 ONT/ODP 数量
    async fn count_olt_dependents(&self, olt_id: &str) -> Result<OltDependents, StorageError>;

    /// 删除 OLT
    ///
    /// - `Restrict`：仍有 ONT/ODP 引用时返回 Conflict，不做任何删除
    /// - `Cascade`：在同一原子操作内删除引用它的 ONT/ODP
    ///
    /// 告警是弱引用，两种策略都不会触碰。
    async fn delete_olt(&self, olt_id: &str, policy: DeletePolicy) -> Result<bool, StorageError>;
}

/// ONT 存储接口
#[async_trait]
pub trait OntStore: Send + Sync {
    /// 按创建时间倒序列出 ONT
    async fn list_onts(&self, filter: &OntFilter) -> Result<Vec<OntRecord>, StorageError>;

    async fn find_ont(&self, ont_id: &str) -> Result<Option<OntRecord>, StorageError>;

    /// 创建 ONT；`olt_id` 指向的 OLT 不存在时返回 ForeignKey 错误
    async fn create_ont(&self, record: OntRecord) -> Result<OntRecord, StorageError>;

    async fn update_ont(
        &self,
        ont_id: &str,
        update: OntUpdate,
    ) -> Result<Option<OntRecord>, StorageError>;

    async fn delete_ont(&self, ont_id: &str) -> Result<bool, StorageError>;
}

/// ODP 存储接口
#[async_trait]
pub trait OdpStore: Send + Sync {
    /// 按创建时间倒序列出 ODP
    async fn list_odps(&self, filter: &OdpFilter) -> Result<Vec<OdpRecord>, StorageError>;

    async fn find_odp(&self, odp_id: &str) -> Result<Option<OdpRecord>, StorageError>;

    async fn create_odp(&self, record: OdpRecord) -> Result<OdpRecord, StorageError>;

    async fn update_odp(
        &self,
        odp_id: &str,
        update: OdpUpdate,
    ) -> Result<Option<OdpRecord>, StorageError>;

    async fn delete_odp(&self, odp_id: &str) -> Result<bool, StorageError>;
}

/// 光缆路由存储接口
#[async_trait]
pub trait CableRouteStore: Send + Sync {
    /// 按名称升序列出光缆路由
    async fn list_cable_routes(
        &self,
        filter: &CableRouteFilter,
    ) -> Result<Vec<CableRouteRecord>, StorageError>;

    async fn find_cable_route(
        &self,
        route_id: &str,
    ) -> Result<Option<CableRouteRecord>, StorageError>;

    async fn create_cable_route(
        &self,
        record: CableRouteRecord,
    ) -> Result<CableRouteRecord, StorageError>;

    async fn update_cable_route(
        &self,
        route_id: &str,
        update: CableRouteUpdate,
    ) -> Result<Option<CableRouteRecord>, StorageError>;

    async fn delete_cable_route(&self, route_id: &str) -> Result<bool, StorageError>;
}

/// 告警存储接口
#[async_trait]
pub trait AlarmStore: Send + Sync {
    /// 按创建时间倒序列出告警
    async fn list_alarms(&self, filter: &AlarmFilter) -> Result<Vec<AlarmRecord>, StorageError>;

    async fn find_alarm(&self, alarm_id: &str) -> Result<Option<AlarmRecord>, StorageError>;

    async fn create_alarm(&self, record: AlarmRecord) -> Result<AlarmRecord, StorageError>;

    async fn update_alarm(
        &self,
        alarm_id: &str,
        update: AlarmUpdate,
    ) -> Result<Option<AlarmRecord>, StorageError>;

    /// 标记告警已解决；已解决的告警保留原解决时间
    async fn resolve_alarm(
        &self,
        alarm_id: &str,
        at_ms: i64,
    ) -> Result<Option<AlarmRecord>, StorageError>;

    async fn delete_alarm(&self, alarm_id: &str) -> Result<bool, StorageError>;
}

/// 系统配置存储接口
#[async_trait]
pub trait SystemConfigStore: Send + Sync {
    /// 按键升序列出配置
    async fn list_configs(&self) -> Result<Vec<SystemConfigRecord>, StorageError>;

    async fn find_config(&self, key: &str) -> Result<Option<SystemConfigRecord>, StorageError>;

    /// 插入或更新单个键。已存在的键只更新 value，保留原描述
    async fn upsert_config(
        &self,
        record: SystemConfigRecord,
    ) -> Result<SystemConfigRecord, StorageError>;
}

/// 资产存储组合接口：服务层只持有这一个句柄。
pub trait InventoryStore:
    UserStore + OltStore + OntStore + OdpStore + CableRouteStore + AlarmStore + SystemConfigStore
{
}

impl<T> InventoryStore for T where
    T: UserStore + OltStore + OntStore + OdpStore + CableRouteStore + AlarmStore + SystemConfigStore
{
}
