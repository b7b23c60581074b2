//! 数据模型
//!
//! 定义所有存储相关的数据模型、整行替换结构与列表过滤条件：
//! - 用户模型：UserRecord, UserUpdate, UserFilter
//! - 设备模型：OltRecord / OntRecord / OdpRecord 及对应 Update、Filter
//! - 光缆路由：CableRouteRecord, CableRouteUpdate, CableRouteFilter
//! - 告警：AlarmRecord, AlarmUpdate, AlarmFilter
//! - 系统配置：SystemConfigRecord
//!
//! `*Update` 总是携带全部可变字段：更新是整行替换而不是补丁合并。

use chrono::NaiveDate;
use domain::{
    AlarmSeverity, AlarmStatus, CableRouteStatus, CableType, DeviceType, GeoPoint, OdpStatus,
    OltStatus, OntStatus, Role, UserStatus,
};

// ============================================================================
// 用户
// ============================================================================

/// 用户记录。`password_hash` 只保存加盐哈希。
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    pub last_login_ms: Option<i64>,
    pub refresh_jti: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// 用户更新输入。`password_hash` 为空表示保留原哈希；
/// 给出新哈希时同时作废已签发的 refresh token。
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl UserFilter {
    pub fn matches(&self, record: &UserRecord) -> bool {
        self.role.is_none_or(|role| record.role == role)
            && self.status.is_none_or(|status| record.status == status)
    }
}

impl UserRecord {
    pub fn apply(&mut self, update: UserUpdate, now_ms: i64) {
        self.email = update.email;
        self.name = update.name;
        self.role = update.role;
        self.status = update.status;
        if let Some(password_hash) = update.password_hash {
            self.password_hash = password_hash;
            self.refresh_jti = None;
        }
        self.updated_at_ms = now_ms;
    }
}

// ============================================================================
// OLT
// ============================================================================

/// OLT 记录。
#[derive(Debug, Clone, PartialEq)]
pub struct OltRecord {
    pub olt_id: String,
    pub name: String,
    pub ip_address: String,
    pub model: String,
    pub vendor: String,
    pub location: String,
    pub status: OltStatus,
    pub firmware_version: Option<String>,
    pub total_ports: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// OLT 整行替换输入。
#[derive(Debug, Clone, PartialEq)]
pub struct OltUpdate {
    pub name: String,
    pub ip_address: String,
    pub model: String,
    pub vendor: String,
    pub location: String,
    pub status: OltStatus,
    pub firmware_version: Option<String>,
    pub total_ports: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
}

impl OltRecord {
    pub fn create(olt_id: String, fields: OltUpdate, now_ms: i64) -> Self {
        Self {
            olt_id,
            name: fields.name,
            ip_address: fields.ip_address,
            model: fields.model,
            vendor: fields.vendor,
            location: fields.location,
            status: fields.status,
            firmware_version: fields.firmware_version,
            total_ports: fields.total_ports,
            latitude: fields.latitude,
            longitude: fields.longitude,
            description: fields.description,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    pub fn apply(&mut self, update: OltUpdate, now_ms: i64) {
        let created_at_ms = self.created_at_ms;
        *self = Self::create(std::mem::take(&mut self.olt_id), update, now_ms);
        self.created_at_ms = created_at_ms;
    }
}

#[derive(Debug, Clone, Default)]
pub struct OltFilter {
    pub status: Option<OltStatus>,
}

impl OltFilter {
    pub fn matches(&self, record: &OltRecord) -> bool {
        self.status.is_none_or(|status| record.status == status)
    }
}

/// 仍引用某台 OLT 的下游记录数量。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OltDependents {
    pub onts: u64,
    pub odps: u64,
}

impl OltDependents {
    pub fn is_empty(&self) -> bool {
        self.onts == 0 && self.odps == 0
    }
}

// ============================================================================
// ONT
// ============================================================================

/// ONT 记录（含用户侧信息）。
#[derive(Debug, Clone, PartialEq)]
pub struct OntRecord {
    pub ont_id: String,
    pub serial_number: String,
    pub mac_address: Option<String>,
    pub olt_id: String,
    pub port: i32,
    pub status: OntStatus,
    pub signal_strength: Option<f64>,
    pub rx_power: Option<f64>,
    pub tx_power: Option<f64>,
    pub distance: Option<f64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub address: Option<String>,
    pub service_package: Option<String>,
    pub install_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// ONT 整行替换输入。
#[derive(Debug, Clone, PartialEq)]
pub struct OntUpdate {
    pub serial_number: String,
    pub mac_address: Option<String>,
    pub olt_id: String,
    pub port: i32,
    pub status: OntStatus,
    pub signal_strength: Option<f64>,
    pub rx_power: Option<f64>,
    pub tx_power: Option<f64>,
    pub distance: Option<f64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub address: Option<String>,
    pub service_package: Option<String>,
    pub install_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl OntRecord {
    pub fn create(ont_id: String, fields: OntUpdate, now_ms: i64) -> Self {
        Self {
            ont_id,
            serial_number: fields.serial_number,
            mac_address: fields.mac_address,
            olt_id: fields.olt_id,
            port: fields.port,
            status: fields.status,
            signal_strength: fields.signal_strength,
            rx_power: fields.rx_power,
            tx_power: fields.tx_power,
            distance: fields.distance,
            customer_name: fields.customer_name,
            customer_phone: fields.customer_phone,
            customer_email: fields.customer_email,
            address: fields.address,
            service_package: fields.service_package,
            install_date: fields.install_date,
            notes: fields.notes,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    pub fn apply(&mut self, update: OntUpdate, now_ms: i64) {
        let created_at_ms = self.created_at_ms;
        *self = Self::create(std::mem::take(&mut self.ont_id), update, now_ms);
        self.created_at_ms = created_at_ms;
    }
}

#[derive(Debug, Clone, Default)]
pub struct OntFilter {
    pub olt_id: Option<String>,
    pub status: Option<OntStatus>,
}

impl OntFilter {
    pub fn matches(&self, record: &OntRecord) -> bool {
        self.olt_id
            .as_deref()
            .is_none_or(|olt_id| record.olt_id == olt_id)
            && self.status.is_none_or(|status| record.status == status)
    }
}

// ============================================================================
// ODP
// ============================================================================

/// ODP 记录。
#[derive(Debug, Clone, PartialEq)]
pub struct OdpRecord {
    pub odp_id: String,
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i32,
    pub status: OdpStatus,
    pub olt_id: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// ODP 整行替换输入。
#[derive(Debug, Clone, PartialEq)]
pub struct OdpUpdate {
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i32,
    pub status: OdpStatus,
    pub olt_id: Option<String>,
}

impl OdpRecord {
    pub fn create(odp_id: String, fields: OdpUpdate, now_ms: i64) -> Self {
        Self {
            odp_id,
            name: fields.name,
            location: fields.location,
            latitude: fields.latitude,
            longitude: fields.longitude,
            capacity: fields.capacity,
            status: fields.status,
            olt_id: fields.olt_id,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    pub fn apply(&mut self, update: OdpUpdate, now_ms: i64) {
        let created_at_ms = self.created_at_ms;
        *self = Self::create(std::mem::take(&mut self.odp_id), update, now_ms);
        self.created_at_ms = created_at_ms;
    }
}

#[derive(Debug, Clone, Default)]
pub struct OdpFilter {
    pub olt_id: Option<String>,
    pub status: Option<OdpStatus>,
}

impl OdpFilter {
    pub fn matches(&self, record: &OdpRecord) -> bool {
        self.olt_id
            .as_deref()
            .is_none_or(|olt_id| record.olt_id.as_deref() == Some(olt_id))
            && self.status.is_none_or(|status| record.status == status)
    }
}

// ============================================================================
// 光缆路由
// ============================================================================

/// 光缆路由记录。端点是自由文本，不关联设备表。
#[derive(Debug, Clone, PartialEq)]
pub struct CableRouteRecord {
    pub route_id: String,
    pub name: String,
    pub description: String,
    pub start_point: String,
    pub end_point: String,
    pub coordinates: Vec<GeoPoint>,
    pub status: CableRouteStatus,
    pub cable_type: CableType,
    pub color: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// 光缆路由整行替换输入。
#[derive(Debug, Clone, PartialEq)]
pub struct CableRouteUpdate {
    pub name: String,
    pub description: String,
    pub start_point: String,
    pub end_point: String,
    pub coordinates: Vec<GeoPoint>,
    pub status: CableRouteStatus,
    pub cable_type: CableType,
    pub color: Option<String>,
}

impl CableRouteRecord {
    pub fn create(route_id: String, fields: CableRouteUpdate, now_ms: i64) -> Self {
        Self {
            route_id,
            name: fields.name,
            description: fields.description,
            start_point: fields.start_point,
            end_point: fields.end_point,
            coordinates: fields.coordinates,
            status: fields.status,
            cable_type: fields.cable_type,
            color: fields.color,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    pub fn apply(&mut self, update: CableRouteUpdate, now_ms: i64) {
        let created_at_ms = self.created_at_ms;
        *self = Self::create(std::mem::take(&mut self.route_id), update, now_ms);
        self.created_at_ms = created_at_ms;
    }
}

#[derive(Debug, Clone, Default)]
pub struct CableRouteFilter {
    pub status: Option<CableRouteStatus>,
    pub cable_type: Option<CableType>,
}

impl CableRouteFilter {
    pub fn matches(&self, record: &CableRouteRecord) -> bool {
        self.status.is_none_or(|status| record.status == status)
            && self
                .cable_type
                .is_none_or(|cable_type| record.cable_type == cable_type)
    }
}

// ============================================================================
// 告警
// ============================================================================

/// 告警记录。`olt_id`/`ont_id` 是弱引用，设备删除后保留原值。
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmRecord {
    pub alarm_id: String,
    pub device_type: DeviceType,
    pub olt_id: Option<String>,
    pub ont_id: Option<String>,
    pub severity: AlarmSeverity,
    pub message: String,
    pub description: Option<String>,
    pub status: AlarmStatus,
    pub resolved_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// 告警整行替换输入。
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmUpdate {
    pub device_type: DeviceType,
    pub olt_id: Option<String>,
    pub ont_id: Option<String>,
    pub severity: AlarmSeverity,
    pub message: String,
    pub description: Option<String>,
    pub status: AlarmStatus,
}

impl AlarmRecord {
    pub fn create(alarm_id: String, fields: AlarmUpdate, now_ms: i64) -> Self {
        let resolved_at_ms = match fields.status {
            AlarmStatus::Resolved => Some(now_ms),
            AlarmStatus::Active => None,
        };
        Self {
            alarm_id,
            device_type: fields.device_type,
            olt_id: fields.olt_id,
            ont_id: fields.ont_id,
            severity: fields.severity,
            message: fields.message,
            description: fields.description,
            status: fields.status,
            resolved_at_ms,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    /// 整行替换；已解决的告警再次保存为 RESOLVED 时保留原解决时间。
    pub fn apply(&mut self, update: AlarmUpdate, now_ms: i64) {
        self.resolved_at_ms = match (update.status, self.resolved_at_ms) {
            (AlarmStatus::Resolved, Some(ts)) => Some(ts),
            (AlarmStatus::Resolved, None) => Some(now_ms),
            (AlarmStatus::Active, _) => None,
        };
        self.device_type = update.device_type;
        self.olt_id = update.olt_id;
        self.ont_id = update.ont_id;
        self.severity = update.severity;
        self.message = update.message;
        self.description = update.description;
        self.status = update.status;
        self.updated_at_ms = now_ms;
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlarmFilter {
    pub status: Option<AlarmStatus>,
    pub severity: Option<AlarmSeverity>,
    pub device_type: Option<DeviceType>,
}

impl AlarmFilter {
    pub fn matches(&self, record: &AlarmRecord) -> bool {
        self.status.is_none_or(|status| record.status == status)
            && self
                .severity
                .is_none_or(|severity| record.severity == severity)
            && self
                .device_type
                .is_none_or(|device_type| record.device_type == device_type)
    }
}

// ============================================================================
// 系统配置
// ============================================================================

/// 键值配置。数值、布尔配置同样以字符串保存。
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfigRecord {
    pub key: String,
    pub value: String,
    pub description: String,
    pub updated_at_ms: i64,
}
