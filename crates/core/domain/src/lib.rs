pub mod geo;
pub mod inventory;

pub use geo::GeoPoint;
pub use inventory::{
    AlarmSeverity, AlarmStatus, CableRouteStatus, CableType, DeletePolicy, DeviceType, OdpStatus,
    OltStatus, OntStatus, Role, UnknownTag, UserStatus,
};

use std::time::{SystemTime, UNIX_EPOCH};

/// 会话上下文：认证守卫解析 token 后注入请求，所有写操作据此记录操作人。
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl SessionContext {
    /// 构造显式身份的会话上下文。
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            role,
        }
    }

    /// 系统内部上下文（种子数据、测试）。
    pub fn system() -> Self {
        Self {
            user_id: "system".to_string(),
            email: "system@localhost".to_string(),
            role: Role::Admin,
        }
    }
}

/// 当前时间戳（毫秒）。
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
