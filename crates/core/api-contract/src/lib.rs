//! 稳定的 DTO 与 API 响应契约。
//!
//! 成功响应直接返回实体（或实体列表），失败响应统一为 [`ApiError`]。
//! 请求体字段全部可选：必填、格式、数值转换由资产服务层统一校验，
//! 数值与坐标字段用 `serde_json::Value` 接收，字符串形式的数字也能通过。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// 错误体
// ============================================================================

/// 失败响应的错误体：`{ "error": "...", "fields": [...] }`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorDto>,
}

/// 单个字段的校验错误。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldErrorDto {
    pub field: String,
    pub message: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(error: impl Into<String>, fields: Vec<FieldErrorDto>) -> Self {
        Self {
            error: error.into(),
            fields,
        }
    }
}

/// 只带提示信息的响应（删除成功等）。
#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// 认证
// ============================================================================

/// 登录请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// access token 过期时间（毫秒时间戳）
    pub expires: u64,
    pub user: UserDto,
}

/// 刷新 token 请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(alias = "refresh_token")]
    pub refresh_token: String,
}

/// 刷新 token 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires: u64,
}

// ============================================================================
// 请求体
// ============================================================================

/// OLT 创建/更新请求体。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OltPayload {
    pub name: Option<String>,
    pub ip_address: Option<String>,
    pub model: Option<String>,
    pub vendor: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub firmware_version: Option<String>,
    pub total_ports: Option<Value>,
    #[serde(alias = "lat")]
    pub latitude: Option<Value>,
    #[serde(alias = "lng")]
    pub longitude: Option<Value>,
    pub description: Option<String>,
}

/// ONT 创建/更新请求体。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntPayload {
    pub serial_number: Option<String>,
    pub mac_address: Option<String>,
    pub olt_id: Option<String>,
    pub port: Option<Value>,
    pub status: Option<String>,
    pub signal_strength: Option<Value>,
    pub rx_power: Option<Value>,
    pub tx_power: Option<Value>,
    pub distance: Option<Value>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub address: Option<String>,
    pub service_package: Option<String>,
    pub install_date: Option<String>,
    pub notes: Option<String>,
}

/// ODP 创建/更新请求体。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdpPayload {
    pub name: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: Option<Value>,
    #[serde(alias = "lng")]
    pub longitude: Option<Value>,
    pub capacity: Option<Value>,
    pub status: Option<String>,
    pub olt_id: Option<String>,
}

/// 光缆路由创建/更新请求体。
///
/// `coordinates` 接受 `[{ "lat": .., "lng": .., "label": .. }]` 或 `[[lat, lng]]` 两种写法。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableRoutePayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_point: Option<String>,
    pub end_point: Option<String>,
    pub coordinates: Option<Value>,
    pub status: Option<String>,
    pub cable_type: Option<String>,
    pub color: Option<String>,
}

/// 告警创建/更新请求体。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmPayload {
    pub device_type: Option<String>,
    pub olt_id: Option<String>,
    pub ont_id: Option<String>,
    pub severity: Option<String>,
    pub message: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// 用户创建/更新请求体。更新时 `password` 为空表示不修改口令。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// 批量保存系统配置：扁平的 key → value 映射。
pub type SettingsPayload = BTreeMap<String, Value>;

// ============================================================================
// 列表查询参数
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OltQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntQuery {
    pub olt_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdpQuery {
    pub olt_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableRouteQuery {
    pub status: Option<String>,
    pub cable_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmQuery {
    pub status: Option<String>,
    pub severity: Option<String>,
    pub device_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub role: Option<String>,
    pub status: Option<String>,
}

// ============================================================================
// 响应体
// ============================================================================

/// OLT 返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OltDto {
    pub id: String,
    pub name: String,
    pub ip_address: String,
    pub model: String,
    pub vendor: String,
    pub location: String,
    pub status: String,
    pub firmware_version: Option<String>,
    pub total_ports: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    /// 仅单个 OLT 详情返回下挂设备数量。
    #[serde(rename = "_count", skip_serializing_if = "Option::is_none")]
    pub count: Option<OltCountDto>,
}

/// OLT 下挂的 ONT/ODP 数量。
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OltCountDto {
    pub onts: u64,
    pub odps: u64,
}

/// ONT/ODP 上标注的所属 OLT。
#[derive(Debug, Clone, Serialize)]
pub struct OltRefDto {
    pub id: String,
    pub name: String,
}

/// ONT 返回结构。`installDate` 为 `YYYY-MM-DD`。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OntDto {
    pub id: String,
    pub serial_number: String,
    pub mac_address: Option<String>,
    pub olt_id: String,
    pub port: i32,
    pub status: String,
    pub signal_strength: Option<f64>,
    pub rx_power: Option<f64>,
    pub tx_power: Option<f64>,
    pub distance: Option<f64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub address: Option<String>,
    pub service_package: Option<String>,
    pub install_date: Option<String>,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub olt: Option<OltRefDto>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// ODP 返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OdpDto {
    pub id: String,
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i32,
    pub status: String,
    pub olt_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub olt: Option<OltRefDto>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// 光缆路由上的坐标点。
#[derive(Debug, Clone, Serialize)]
pub struct CoordinateDto {
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// 光缆路由返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CableRouteDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_point: String,
    pub end_point: String,
    pub coordinates: Vec<CoordinateDto>,
    pub status: String,
    pub cable_type: String,
    pub color: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// 告警返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmDto {
    pub id: String,
    pub device_type: String,
    pub olt_id: Option<String>,
    pub ont_id: Option<String>,
    pub severity: String,
    pub message: String,
    pub description: Option<String>,
    pub status: String,
    pub resolved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// 用户返回结构（不含口令哈希）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// 系统配置：扁平的 key → value 映射。
pub type SettingsDto = BTreeMap<String, String>;

/// 批量保存系统配置的汇总结果。
#[derive(Debug, Serialize)]
pub struct SettingsSaveDto {
    pub saved: usize,
}

/// 设备数量统计。
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DeviceCountDto {
    pub total: u64,
    pub online: u64,
    pub offline: u64,
}

/// 仪表盘汇总。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub olts: DeviceCountDto,
    pub onts: DeviceCountDto,
    pub active_alarms: u64,
    pub recent_alarms: Vec<AlarmDto>,
    pub recent_onts: Vec<OntDto>,
}

/// 操作计数快照。
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    pub creates: u64,
    pub updates: u64,
    pub deletes: u64,
    pub validation_failures: u64,
    pub conflicts: u64,
    pub not_found: u64,
    pub internal_failures: u64,
    pub logins: u64,
    pub login_failures: u64,
}

/// 健康检查返回结构。
#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub storage: String,
}
