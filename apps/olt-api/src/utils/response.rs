//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：auth_error, invalid_credentials_error, bad_request_error, inventory_error, internal_auth_error
//! - DTO 转换：olt_to_dto, ont_to_dto, odp_to_dto, cable_route_to_dto, alarm_to_dto, user_to_dto, dashboard_to_dto
//! - ONT/ODP 响应需要所属 OLT 名称，经 `with_olt_names` 取一次映射后再转换
//!
//! 状态码映射集中在这里：
//! - 校验失败 400（附带 `fields`）
//! - 未认证 401
//! - 资源或外键目标不存在 404
//! - 唯一键冲突或删除受限 409
//! - 其余 500，错误详情只写日志

use crate::AppState;
use api_contract::{
    AlarmDto, ApiError, CableRouteDto, CoordinateDto, DashboardDto, DeviceCountDto, FieldErrorDto,
    OdpDto, OltCountDto, OltDto, OltRefDto, OntDto, UserDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use olt_auth::AuthError;
use olt_inventory::{DashboardSummary, DeviceCounts, InventoryError, OltDetail, OltNames};
use serde::Serialize;
use olt_storage::{
    AlarmRecord, CableRouteRecord, OdpRecord, OltRecord, OntRecord, UserRecord,
};

/// 通用错误响应
pub fn error_response(status: StatusCode, body: ApiError) -> Response {
    (status, Json(body)).into_response()
}

/// 认证错误响应
pub fn auth_error() -> Response {
    error_response(StatusCode::UNAUTHORIZED, ApiError::new("Unauthorized"))
}

/// 登录失败响应（不区分邮箱不存在与口令错误）
pub fn invalid_credentials_error() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        ApiError::new("Invalid email or password"),
    )
}

/// 账户已停用
pub fn account_disabled_error() -> Response {
    error_response(StatusCode::UNAUTHORIZED, ApiError::new("Account is disabled"))
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, ApiError::new(message))
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    tracing::error!(error = %err, "auth internal error");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::new("Internal server error"),
    )
}

/// 资产服务错误响应
pub fn inventory_error(err: InventoryError) -> Response {
    match err {
        InventoryError::Validation(fields) => {
            let error = fields
                .first()
                .map(|field| field.message.clone())
                .unwrap_or_else(|| "Invalid request".to_string());
            let fields = fields
                .into_iter()
                .map(|field| FieldErrorDto {
                    field: field.field,
                    message: field.message,
                })
                .collect();
            error_response(StatusCode::BAD_REQUEST, ApiError::with_fields(error, fields))
        }
        InventoryError::NotFound(message) => {
            error_response(StatusCode::NOT_FOUND, ApiError::new(message))
        }
        InventoryError::Conflict(message) => {
            error_response(StatusCode::CONFLICT, ApiError::new(message))
        }
        InventoryError::Internal(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("Internal server error"),
        ),
    }
}

/// 取 OLT 名称映射后构造响应体
pub async fn with_olt_names<T, F>(state: &AppState, status: StatusCode, build: F) -> Response
where
    T: Serialize,
    F: FnOnce(&OltNames) -> T,
{
    match state.inventory.olt_names().await {
        Ok(names) => (status, Json(build(&names))).into_response(),
        Err(err) => inventory_error(err),
    }
}

fn olt_ref(olt_id: &str, names: &OltNames) -> Option<OltRefDto> {
    names.get(olt_id).map(|name| OltRefDto {
        id: olt_id.to_string(),
        name: name.clone(),
    })
}

/// OltDetail 转 OltDto，附带 `_count`
pub fn olt_detail_to_dto(detail: OltDetail) -> OltDto {
    OltDto {
        count: Some(OltCountDto {
            onts: detail.dependents.onts,
            odps: detail.dependents.odps,
        }),
        ..olt_to_dto(detail.olt)
    }
}

/// OltRecord 转 OltDto
pub fn olt_to_dto(record: OltRecord) -> OltDto {
    OltDto {
        id: record.olt_id,
        name: record.name,
        ip_address: record.ip_address,
        model: record.model,
        vendor: record.vendor,
        location: record.location,
        status: record.status.to_string(),
        firmware_version: record.firmware_version,
        total_ports: record.total_ports,
        latitude: record.latitude,
        longitude: record.longitude,
        description: record.description,
        created_at: record.created_at_ms,
        updated_at: record.updated_at_ms,
        count: None,
    }
}

/// OntRecord 转 OntDto
pub fn ont_to_dto(record: OntRecord, names: &OltNames) -> OntDto {
    let olt = olt_ref(&record.olt_id, names);
    OntDto {
        id: record.ont_id,
        serial_number: record.serial_number,
        mac_address: record.mac_address,
        olt_id: record.olt_id,
        port: record.port,
        status: record.status.to_string(),
        signal_strength: record.signal_strength,
        rx_power: record.rx_power,
        tx_power: record.tx_power,
        distance: record.distance,
        customer_name: record.customer_name,
        customer_phone: record.customer_phone,
        customer_email: record.customer_email,
        address: record.address,
        service_package: record.service_package,
        install_date: record
            .install_date
            .map(|date| date.format("%Y-%m-%d").to_string()),
        notes: record.notes,
        olt,
        created_at: record.created_at_ms,
        updated_at: record.updated_at_ms,
    }
}

/// OdpRecord 转 OdpDto
pub fn odp_to_dto(record: OdpRecord, names: &OltNames) -> OdpDto {
    let olt = record
        .olt_id
        .as_deref()
        .and_then(|olt_id| olt_ref(olt_id, names));
    OdpDto {
        id: record.odp_id,
        name: record.name,
        location: record.location,
        latitude: record.latitude,
        longitude: record.longitude,
        capacity: record.capacity,
        status: record.status.to_string(),
        olt_id: record.olt_id,
        olt,
        created_at: record.created_at_ms,
        updated_at: record.updated_at_ms,
    }
}

/// CableRouteRecord 转 CableRouteDto
pub fn cable_route_to_dto(record: CableRouteRecord) -> CableRouteDto {
    CableRouteDto {
        id: record.route_id,
        name: record.name,
        description: record.description,
        start_point: record.start_point,
        end_point: record.end_point,
        coordinates: record
            .coordinates
            .into_iter()
            .map(|point| CoordinateDto {
                lat: point.lat,
                lng: point.lng,
                label: point.label,
            })
            .collect(),
        status: record.status.to_string(),
        cable_type: record.cable_type.to_string(),
        color: record.color,
        created_at: record.created_at_ms,
        updated_at: record.updated_at_ms,
    }
}

/// AlarmRecord 转 AlarmDto
pub fn alarm_to_dto(record: AlarmRecord) -> AlarmDto {
    AlarmDto {
        id: record.alarm_id,
        device_type: record.device_type.to_string(),
        olt_id: record.olt_id,
        ont_id: record.ont_id,
        severity: record.severity.to_string(),
        message: record.message,
        description: record.description,
        status: record.status.to_string(),
        resolved_at: record.resolved_at_ms,
        created_at: record.created_at_ms,
        updated_at: record.updated_at_ms,
    }
}

/// UserRecord 转 UserDto（不含口令哈希）
pub fn user_to_dto(record: UserRecord) -> UserDto {
    UserDto {
        id: record.user_id,
        email: record.email,
        name: record.name,
        role: record.role.to_string(),
        status: record.status.to_string(),
        last_login: record.last_login_ms,
        created_at: record.created_at_ms,
        updated_at: record.updated_at_ms,
    }
}

fn counts_to_dto(counts: DeviceCounts) -> DeviceCountDto {
    DeviceCountDto {
        total: counts.total,
        online: counts.online,
        offline: counts.offline,
    }
}

/// DashboardSummary 转 DashboardDto
pub fn dashboard_to_dto(summary: DashboardSummary, names: &OltNames) -> DashboardDto {
    DashboardDto {
        olts: counts_to_dto(summary.olts),
        onts: counts_to_dto(summary.onts),
        active_alarms: summary.active_alarms,
        recent_alarms: summary.recent_alarms.into_iter().map(alarm_to_dto).collect(),
        recent_onts: summary
            .recent_onts
            .into_iter()
            .map(|record| ont_to_dto(record, names))
            .collect(),
    }
}
