//! 演示数据：管理员/操作员账户、两台 OLT 及其下游设备、光缆路由、告警与基础配置。
//!
//! 全部数据经过与 API 相同的校验路径写入，仅在存储为空时执行。

use crate::error::InventoryError;
use crate::service::InventoryService;
use api_contract::{
    AlarmPayload, CableRoutePayload, OdpPayload, OltPayload, OntPayload, UserPayload,
};
use domain::{SessionContext, now_epoch_ms};
use olt_storage::{SystemConfigRecord, SystemConfigStore, UserFilter, UserStore};
use serde_json::{Value, json};
use tracing::info;

/// 演示管理员账户。
pub const DEMO_ADMIN_EMAIL: &str = "admin@smartolt.com";
pub const DEMO_ADMIN_PASSWORD: &str = "Admin123!";

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn user(email: &str, password: &str, name: &str, role: &str) -> UserPayload {
    UserPayload {
        email: text(email),
        name: text(name),
        password: text(password),
        role: text(role),
        status: text("ACTIVE"),
    }
}

#[allow(clippy::too_many_arguments)]
fn olt(
    name: &str,
    ip: &str,
    vendor: &str,
    location: &str,
    firmware: &str,
    lat: f64,
    lng: f64,
    description: &str,
) -> OltPayload {
    OltPayload {
        name: text(name),
        ip_address: text(ip),
        model: text("OLT-8000"),
        vendor: text(vendor),
        location: text(location),
        status: text("ONLINE"),
        firmware_version: text(firmware),
        total_ports: Some(json!(16)),
        latitude: Some(json!(lat)),
        longitude: Some(json!(lng)),
        description: text(description),
    }
}

fn odp(name: &str, location: &str, lat: f64, lng: f64, olt_id: &str) -> OdpPayload {
    OdpPayload {
        name: text(name),
        location: text(location),
        latitude: Some(json!(lat)),
        longitude: Some(json!(lng)),
        capacity: None,
        status: text("ONLINE"),
        olt_id: text(olt_id),
    }
}

struct DemoOnt<'a> {
    serial: &'a str,
    mac: &'a str,
    port: i32,
    signal: f64,
    rx: f64,
    tx: f64,
    distance: f64,
    customer: &'a str,
    phone: &'a str,
    email: &'a str,
    address: &'a str,
    package: &'a str,
    installed: &'a str,
    notes: &'a str,
}

impl DemoOnt<'_> {
    fn payload(&self, olt_id: &str) -> OntPayload {
        OntPayload {
            serial_number: text(self.serial),
            mac_address: text(self.mac),
            olt_id: text(olt_id),
            port: Some(json!(self.port)),
            status: text("ONLINE"),
            signal_strength: Some(json!(self.signal)),
            rx_power: Some(json!(self.rx)),
            tx_power: Some(json!(self.tx)),
            distance: Some(json!(self.distance)),
            customer_name: text(self.customer),
            customer_phone: text(self.phone),
            customer_email: text(self.email),
            address: text(self.address),
            service_package: text(self.package),
            install_date: text(self.installed),
            notes: text(self.notes),
        }
    }
}

fn route(name: &str, description: &str, color: &str, points: Value) -> CableRoutePayload {
    let labels: Vec<&str> = points
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|point| point.get("label").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    CableRoutePayload {
        name: text(name),
        description: text(description),
        start_point: labels.first().map(|label| label.to_string()),
        end_point: labels.last().map(|label| label.to_string()),
        coordinates: Some(points.clone()),
        status: text("active"),
        cable_type: text("fiber"),
        color: text(color),
    }
}

async fn has_users(service: &InventoryService, step: &str) -> Result<bool, InventoryError> {
    let existing = service
        .store()
        .list_users(&UserFilter::default())
        .await?;
    if !existing.is_empty() {
        info!(target: "olt.seed", step, users = existing.len(), "seed_skipped");
    }
    Ok(!existing.is_empty())
}

/// 账户表为空时创建首个管理员，返回是否创建。
///
/// 用于没有演示数据的部署（例如全新的 Postgres 库）获得第一个可登录账户。
pub async fn bootstrap_admin(
    service: &InventoryService,
    email: &str,
    password: &str,
) -> Result<bool, InventoryError> {
    if has_users(service, "bootstrap_admin").await? {
        return Ok(false);
    }
    let admin = service
        .create_user(
            &SessionContext::system(),
            user(email, password, "Administrator", "ADMIN"),
        )
        .await?;
    info!(target: "olt.seed", user_id = %admin.user_id, "bootstrap_admin_created");
    Ok(true)
}

/// 写入演示数据。已存在用户时视为已初始化，直接跳过。
pub async fn seed_demo_data(service: &InventoryService) -> Result<bool, InventoryError> {
    if has_users(service, "demo_data").await? {
        return Ok(false);
    }
    let ctx = SessionContext::system();

    service
        .create_user(
            &ctx,
            user(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, "Administrator", "ADMIN"),
        )
        .await?;
    service
        .create_user(
            &ctx,
            user("operator@smartolt.com", "Operator123!", "Operator User", "OPERATOR"),
        )
        .await?;

    let jakarta = service
        .create_olt(
            &ctx,
            olt(
                "OLT-Jakarta-01",
                "192.168.1.100",
                "Huawei",
                "Jakarta Pusat",
                "v2.1.5",
                -6.2088,
                106.8456,
                "Main OLT for Jakarta Central area",
            ),
        )
        .await?;
    let bandung = service
        .create_olt(
            &ctx,
            olt(
                "OLT-Bandung-01",
                "192.168.1.101",
                "ZTE",
                "Bandung",
                "v2.0.8",
                -6.9175,
                107.6191,
                "Main OLT for Bandung area",
            ),
        )
        .await?;

    for payload in [
        odp("ODP - Jakarta Pusat", "Jakarta Pusat", -6.2088, 106.8456, &jakarta.olt_id),
        odp("ODP - Sudirman", "Sudirman, Jakarta", -6.223, 106.85, &jakarta.olt_id),
        odp("ODP - Bandung", "Bandung", -6.9175, 107.6191, &bandung.olt_id),
    ] {
        service.create_odp(&ctx, payload).await?;
    }

    for payload in [
        route(
            "Route Jakarta Central",
            "Fiber route from OLT Jakarta to ODPs Sudirman & Kuningan",
            "#16a34a",
            json!([
                { "lat": -6.2088, "lng": 106.8456, "label": "OLT Jakarta" },
                { "lat": -6.223, "lng": 106.85, "label": "ODP Sudirman" },
                { "lat": -6.2305, "lng": 106.86, "label": "ODP Kuningan" }
            ]),
        ),
        route(
            "Route Bandung City",
            "Fiber route from OLT Bandung to ODP Braga",
            "#dc2626",
            json!([
                { "lat": -6.9175, "lng": 107.6191, "label": "OLT Bandung" },
                { "lat": -6.905, "lng": 107.61, "label": "ODP Braga" }
            ]),
        ),
    ] {
        service.create_cable_route(&ctx, payload).await?;
    }

    let onts = [
        (
            &jakarta.olt_id,
            DemoOnt {
                serial: "HWTC12345678",
                mac: "00:11:22:33:44:55",
                port: 1,
                signal: -18.5,
                rx: -19.2,
                tx: 2.5,
                distance: 1.2,
                customer: "PT. Example Indonesia",
                phone: "+62-21-12345678",
                email: "contact@example.co.id",
                address: "Jl. Sudirman No. 123, Jakarta Pusat",
                package: "100 Mbps",
                installed: "2024-01-15",
                notes: "Corporate customer",
            },
        ),
        (
            &jakarta.olt_id,
            DemoOnt {
                serial: "HWTC87654321",
                mac: "00:11:22:33:44:56",
                port: 2,
                signal: -20.1,
                rx: -20.8,
                tx: 2.3,
                distance: 1.8,
                customer: "Budi Santoso",
                phone: "+62-812-3456-7890",
                email: "budi@email.com",
                address: "Jl. Merdeka No. 45, Jakarta Selatan",
                package: "50 Mbps",
                installed: "2024-02-20",
                notes: "Residential customer",
            },
        ),
        (
            &bandung.olt_id,
            DemoOnt {
                serial: "ZTEC11111111",
                mac: "00:11:22:33:44:57",
                port: 1,
                signal: -17.8,
                rx: -18.5,
                tx: 2.6,
                distance: 0.9,
                customer: "Siti Nurhaliza",
                phone: "+62-822-9876-5432",
                email: "siti@email.com",
                address: "Jl. Braga No. 78, Bandung",
                package: "200 Mbps",
                installed: "2024-03-10",
                notes: "Premium residential customer",
            },
        ),
    ];
    let mut degraded_ont_id = None;
    for (olt_id, ont) in &onts {
        let record = service.create_ont(&ctx, ont.payload(olt_id)).await?;
        if ont.serial == "HWTC87654321" {
            degraded_ont_id = Some(record.ont_id);
        }
    }

    service
        .create_alarm(
            &ctx,
            AlarmPayload {
                device_type: text("ONT"),
                olt_id: None,
                ont_id: degraded_ont_id,
                severity: text("WARNING"),
                message: text("Signal strength degraded"),
                description: text("ONT signal strength below threshold (-20 dBm)"),
                status: text("ACTIVE"),
            },
        )
        .await?;

    let now_ms = now_epoch_ms();
    for (key, value, description) in [
        ("company_name", "SmartOLT Management", "Company name displayed in the application"),
        ("snmp_community", "public", "Default SNMP community string"),
    ] {
        service
            .store()
            .upsert_config(SystemConfigRecord {
                key: key.to_string(),
                value: value.to_string(),
                description: description.to_string(),
                updated_at_ms: now_ms,
            })
            .await?;
    }

    info!(target: "olt.seed", "seed_completed");
    Ok(true)
}
