use api_contract::{
    AlarmPayload, AlarmQuery, CableRoutePayload, CableRouteQuery, OdpPayload, OdpQuery, OltPayload,
    OltQuery, OntPayload, OntQuery,
};
use domain::{
    AlarmStatus, CableRouteStatus, CableType, DeletePolicy, OdpStatus, OltStatus, OntStatus,
    SessionContext,
};
use olt_inventory::{InventoryError, InventoryPolicy, InventoryService};
use olt_storage::InMemoryStore;
use serde_json::json;
use std::sync::Arc;

fn service() -> InventoryService {
    InventoryService::new(Arc::new(InMemoryStore::new()))
}

fn service_with_policy(delete_policy: DeletePolicy) -> InventoryService {
    InventoryService::new_with_policy(
        Arc::new(InMemoryStore::new()),
        InventoryPolicy {
            odp_default_capacity: 24,
            delete_policy,
        },
    )
}

fn ctx() -> SessionContext {
    SessionContext::system()
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn olt_payload(name: &str, ip: &str) -> OltPayload {
    OltPayload {
        name: text(name),
        ip_address: text(ip),
        model: text("OLT-8000"),
        vendor: text("Huawei"),
        location: text("Jakarta Pusat"),
        ..OltPayload::default()
    }
}

fn ont_payload(serial: &str, olt_id: &str) -> OntPayload {
    OntPayload {
        serial_number: text(serial),
        olt_id: text(olt_id),
        port: Some(json!(1)),
        ..OntPayload::default()
    }
}

fn odp_payload(name: &str, olt_id: Option<&str>) -> OdpPayload {
    OdpPayload {
        name: text(name),
        location: text("Sudirman, Jakarta"),
        latitude: Some(json!("-6.2088")),
        longitude: Some(json!(106.8456)),
        olt_id: olt_id.map(str::to_string),
        ..OdpPayload::default()
    }
}

fn route_payload(name: &str, coordinates: serde_json::Value) -> CableRoutePayload {
    CableRoutePayload {
        name: text(name),
        start_point: text("OLT Jakarta"),
        end_point: text("ODP Sudirman"),
        coordinates: Some(coordinates),
        ..CableRoutePayload::default()
    }
}

fn field_names(err: &InventoryError) -> Vec<&str> {
    match err {
        InventoryError::Validation(fields) => {
            fields.iter().map(|field| field.field.as_str()).collect()
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn conflict_message(err: InventoryError) -> String {
    match err {
        InventoryError::Conflict(message) => message,
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_required_field_is_not_persisted() {
    let service = service();
    let mut payload = olt_payload("OLT-1", "10.0.0.1");
    payload.vendor = None;

    let err = service
        .create_olt(&ctx(), payload)
        .await
        .expect_err("vendor missing");
    assert_eq!(field_names(&err), ["vendor"]);

    let olts = service.list_olts(OltQuery::default()).await.expect("list");
    assert!(olts.is_empty());
}

#[tokio::test]
async fn duplicate_unique_key_keeps_one_row() {
    let service = service();
    service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("first");
    let err = service
        .create_olt(&ctx(), olt_payload("OLT-2", "10.0.0.1"))
        .await
        .expect_err("duplicate ip");
    assert!(matches!(err, InventoryError::Conflict(_)));

    let olts = service.list_olts(OltQuery::default()).await.expect("list");
    assert_eq!(olts.len(), 1);
    assert_eq!(olts[0].name, "OLT-1");
}

#[tokio::test]
async fn create_then_read_returns_supplied_fields() {
    let service = service();
    let mut payload = olt_payload("OLT-Jakarta-01", "192.168.1.100");
    payload.status = text("online");
    payload.total_ports = Some(json!("32"));
    payload.latitude = Some(json!(-6.2088));
    payload.longitude = Some(json!("106.8456"));
    let created = service.create_olt(&ctx(), payload).await.expect("create");

    let read = service.get_olt(&created.olt_id).await.expect("read");
    assert!(!read.olt_id.is_empty());
    assert!(read.created_at_ms > 0);
    assert_eq!(read.created_at_ms, read.updated_at_ms);
    assert_eq!(read.name, "OLT-Jakarta-01");
    assert_eq!(read.status, OltStatus::Online);
    assert_eq!(read.total_ports, 32);
    assert_eq!(read.latitude, Some(-6.2088));
    assert_eq!(read.longitude, Some(106.8456));
}

#[tokio::test]
async fn route_needs_at_least_two_points() {
    let service = service();
    let err = service
        .create_cable_route(&ctx(), route_payload("Route A", json!([[-6.2, 106.8]])))
        .await
        .expect_err("one point");
    let InventoryError::Validation(fields) = &err else {
        panic!("expected validation error");
    };
    assert_eq!(fields[0].field, "coordinates");
    assert!(fields[0].message.contains("at least 2"));

    let route = service
        .create_cable_route(
            &ctx(),
            route_payload("Route A", json!([[-6.2, 106.8], [-6.3, 106.9]])),
        )
        .await
        .expect("two points");
    assert_eq!(route.coordinates.len(), 2);
    assert_eq!(route.description, "");
    assert_eq!(route.cable_type.as_str(), "fiber");

    let routes = service
        .list_cable_routes(CableRouteQuery::default())
        .await
        .expect("list");
    assert_eq!(routes.len(), 1);
}

#[tokio::test]
async fn odp_latitude_range_is_enforced() {
    let service = service_with_policy(DeletePolicy::Restrict);
    let mut payload = odp_payload("ODP-1", None);
    payload.latitude = Some(json!(95));
    let err = service
        .create_odp(&ctx(), payload)
        .await
        .expect_err("out of range");
    assert_eq!(field_names(&err), ["latitude"]);

    let odp = service
        .create_odp(&ctx(), odp_payload("ODP-1", None))
        .await
        .expect("in range");
    assert_eq!(odp.latitude, -6.2088);
    assert_eq!(odp.capacity, 24);
}

#[tokio::test]
async fn delete_missing_id_is_not_found() {
    let service = service();
    service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("create");

    let err = service
        .delete_olt(&ctx(), "missing")
        .await
        .expect_err("missing");
    assert!(matches!(err, InventoryError::NotFound(ref message) if message == "OLT not found"));
    assert!(service.delete_alarm(&ctx(), "missing").await.is_err());

    let olts = service.list_olts(OltQuery::default()).await.expect("list");
    assert_eq!(olts.len(), 1);
}

#[tokio::test]
async fn update_replaces_every_field() {
    let service = service();
    let mut original = olt_payload("OLT-1", "10.0.0.1");
    original.firmware_version = text("v1.0");
    original.description = text("old");
    original.latitude = Some(json!(-6.0));
    let created = service.create_olt(&ctx(), original).await.expect("create");

    let replacement = OltPayload {
        name: text("OLT-1b"),
        ip_address: text("10.0.0.2"),
        model: text("MA5800"),
        vendor: text("ZTE"),
        location: text("Bandung"),
        status: text("MAINTENANCE"),
        firmware_version: None,
        total_ports: Some(json!(8)),
        latitude: None,
        longitude: Some(json!(107.6)),
        description: None,
    };
    service
        .update_olt(&ctx(), &created.olt_id, replacement)
        .await
        .expect("update");

    let read = service.get_olt(&created.olt_id).await.expect("read");
    assert_eq!(read.name, "OLT-1b");
    assert_eq!(read.ip_address, "10.0.0.2");
    assert_eq!(read.model, "MA5800");
    assert_eq!(read.vendor, "ZTE");
    assert_eq!(read.location, "Bandung");
    assert_eq!(read.status, OltStatus::Maintenance);
    assert_eq!(read.total_ports, 8);
    assert_eq!(read.firmware_version, None);
    assert_eq!(read.latitude, None);
    assert_eq!(read.longitude, Some(107.6));
    assert_eq!(read.description, None);
    assert_eq!(read.created_at_ms, created.created_at_ms);
}

#[tokio::test]
async fn update_missing_id_is_not_found() {
    let service = service();
    let err = service
        .update_olt(&ctx(), "missing", olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect_err("missing");
    assert!(matches!(err, InventoryError::NotFound(_)));
}

#[tokio::test]
async fn ont_requires_existing_olt() {
    let service = service();
    let err = service
        .create_ont(&ctx(), ont_payload("HWTC1", "missing"))
        .await
        .expect_err("no olt");
    assert!(matches!(err, InventoryError::NotFound(ref message) if message == "OLT not found"));

    let olt = service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("olt");
    let ont = service
        .create_ont(&ctx(), ont_payload("HWTC1", &olt.olt_id))
        .await
        .expect("ont");
    assert_eq!(ont.olt_id, olt.olt_id);

    let err = service
        .create_ont(&ctx(), ont_payload("HWTC1", &olt.olt_id))
        .await
        .expect_err("duplicate serial");
    assert!(matches!(err, InventoryError::Conflict(_)));

    let filtered = service
        .list_onts(OntQuery {
            olt_id: Some(olt.olt_id.clone()),
            status: Some("pending".to_string()),
        })
        .await
        .expect("filter");
    assert_eq!(filtered.len(), 1);
}

#[tokio::test]
async fn unknown_filter_value_is_rejected() {
    let service = service();
    let err = service
        .list_alarms(AlarmQuery {
            severity: Some("LOUD".to_string()),
            ..AlarmQuery::default()
        })
        .await
        .expect_err("bad filter");
    assert_eq!(field_names(&err), ["severity"]);
}

#[tokio::test]
async fn restrict_policy_blocks_delete_with_dependents() {
    let service = service_with_policy(DeletePolicy::Restrict);
    let olt = service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("olt");
    service
        .create_ont(&ctx(), ont_payload("HWTC1", &olt.olt_id))
        .await
        .expect("ont");

    let err = service
        .delete_olt(&ctx(), &olt.olt_id)
        .await
        .expect_err("still referenced");
    assert!(matches!(err, InventoryError::Conflict(_)));
    assert!(service.get_olt(&olt.olt_id).await.is_ok());
}

#[tokio::test]
async fn cascade_policy_removes_dependents_but_keeps_alarms() {
    let service = service_with_policy(DeletePolicy::Cascade);
    let olt = service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("olt");
    service
        .create_ont(&ctx(), ont_payload("HWTC1", &olt.olt_id))
        .await
        .expect("ont");
    service
        .create_odp(&ctx(), odp_payload("ODP-1", Some(&olt.olt_id)))
        .await
        .expect("odp");
    service
        .create_alarm(
            &ctx(),
            AlarmPayload {
                device_type: text("OLT"),
                olt_id: Some(olt.olt_id.clone()),
                severity: text("CRITICAL"),
                message: text("Link down"),
                ..AlarmPayload::default()
            },
        )
        .await
        .expect("alarm");

    service
        .delete_olt(&ctx(), &olt.olt_id)
        .await
        .expect("cascade");

    assert!(service.list_onts(OntQuery::default()).await.expect("onts").is_empty());
    assert!(service.list_odps(OdpQuery::default()).await.expect("odps").is_empty());
    let alarms = service.list_alarms(AlarmQuery::default()).await.expect("alarms");
    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0].olt_id.as_deref(), Some(olt.olt_id.as_str()));
}

#[tokio::test]
async fn resolve_alarm_stamps_time_once() {
    let service = service();
    let alarm = service
        .create_alarm(
            &ctx(),
            AlarmPayload {
                device_type: text("ONT"),
                ont_id: text("ont-1"),
                severity: text("WARNING"),
                message: text("Signal strength degraded"),
                ..AlarmPayload::default()
            },
        )
        .await
        .expect("alarm");
    assert_eq!(alarm.status, AlarmStatus::Active);
    assert!(alarm.resolved_at_ms.is_none());

    let resolved = service
        .resolve_alarm(&ctx(), &alarm.alarm_id)
        .await
        .expect("resolve");
    assert_eq!(resolved.status, AlarmStatus::Resolved);
    let resolved_at = resolved.resolved_at_ms.expect("stamped");

    let again = service
        .resolve_alarm(&ctx(), &alarm.alarm_id)
        .await
        .expect("resolve again");
    assert_eq!(again.resolved_at_ms, Some(resolved_at));

    let reopened = service
        .update_alarm(
            &ctx(),
            &alarm.alarm_id,
            AlarmPayload {
                device_type: text("ONT"),
                ont_id: text("ont-1"),
                severity: text("WARNING"),
                message: text("Signal strength degraded"),
                status: text("ACTIVE"),
                ..AlarmPayload::default()
            },
        )
        .await
        .expect("reopen");
    assert!(reopened.resolved_at_ms.is_none());

    let err = service
        .resolve_alarm(&ctx(), "missing")
        .await
        .expect_err("missing");
    assert!(matches!(err, InventoryError::NotFound(_)));
}

#[tokio::test]
async fn olt_ip_collision_on_update_keeps_both_rows() {
    let service = service();
    let first = service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("first");
    let second = service
        .create_olt(&ctx(), olt_payload("OLT-2", "10.0.0.2"))
        .await
        .expect("second");

    let err = service
        .update_olt(&ctx(), &second.olt_id, olt_payload("OLT-2", " 10.0.0.1 "))
        .await
        .expect_err("ip taken");
    assert_eq!(conflict_message(err), "ip address already in use");

    // 改回自己的 IP 不算冲突
    service
        .update_olt(&ctx(), &first.olt_id, olt_payload("OLT-1a", "10.0.0.1"))
        .await
        .expect("same ip");
    let read = service.get_olt(&second.olt_id).await.expect("read");
    assert_eq!(read.ip_address, "10.0.0.2");
}

#[tokio::test]
async fn ont_serial_is_unique_on_create_and_update() {
    let service = service();
    let olt = service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("olt");
    service
        .create_ont(&ctx(), ont_payload("HWTC1", &olt.olt_id))
        .await
        .expect("first");
    let second = service
        .create_ont(&ctx(), ont_payload("HWTC2", &olt.olt_id))
        .await
        .expect("second");

    let err = service
        .create_ont(&ctx(), ont_payload("HWTC1", &olt.olt_id))
        .await
        .expect_err("duplicate create");
    assert_eq!(conflict_message(err), "serial number already registered");

    let err = service
        .update_ont(&ctx(), &second.ont_id, ont_payload("HWTC1", &olt.olt_id))
        .await
        .expect_err("duplicate update");
    assert_eq!(conflict_message(err), "serial number already registered");
    let read = service.get_ont(&second.ont_id).await.expect("read");
    assert_eq!(read.serial_number, "HWTC2");
}

#[tokio::test]
async fn odp_name_is_unique_on_create_and_update() {
    let service = service();
    service
        .create_odp(&ctx(), odp_payload("ODP-1", None))
        .await
        .expect("first");
    let second = service
        .create_odp(&ctx(), odp_payload("ODP-2", None))
        .await
        .expect("second");

    let err = service
        .create_odp(&ctx(), odp_payload("ODP-1", None))
        .await
        .expect_err("duplicate create");
    assert_eq!(conflict_message(err), "odp name already in use");

    let err = service
        .update_odp(&ctx(), &second.odp_id, odp_payload("ODP-1", None))
        .await
        .expect_err("duplicate update");
    assert_eq!(conflict_message(err), "odp name already in use");
    let odps = service.list_odps(OdpQuery::default()).await.expect("list");
    assert_eq!(odps.len(), 2);
}

#[tokio::test]
async fn cable_route_name_is_unique_on_create_and_update() {
    let service = service();
    let points = json!([[-6.2, 106.8], [-6.3, 106.9]]);
    service
        .create_cable_route(&ctx(), route_payload("Route A", points.clone()))
        .await
        .expect("first");
    let second = service
        .create_cable_route(&ctx(), route_payload("Route B", points.clone()))
        .await
        .expect("second");

    let err = service
        .create_cable_route(&ctx(), route_payload("Route A", points.clone()))
        .await
        .expect_err("duplicate create");
    assert_eq!(conflict_message(err), "cable route name already in use");

    let err = service
        .update_cable_route(&ctx(), &second.route_id, route_payload("Route A", points))
        .await
        .expect_err("duplicate update");
    assert_eq!(conflict_message(err), "cable route name already in use");
    let read = service
        .get_cable_route(&second.route_id)
        .await
        .expect("read");
    assert_eq!(read.name, "Route B");
}

#[tokio::test]
async fn ont_update_replaces_every_field() {
    let service = service();
    let olt = service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("olt");
    let other_olt = service
        .create_olt(&ctx(), olt_payload("OLT-2", "10.0.0.2"))
        .await
        .expect("other olt");
    let mut original = ont_payload("HWTC1", &olt.olt_id);
    original.mac_address = text("aa:bb:cc:dd:ee:ff");
    original.status = text("ONLINE");
    original.rx_power = Some(json!(-21.5));
    original.customer_name = text("Budi");
    original.install_date = text("2024-03-01");
    original.notes = text("old");
    let created = service.create_ont(&ctx(), original).await.expect("create");
    assert_eq!(created.mac_address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));

    let replacement = OntPayload {
        serial_number: text("HWTC1-B"),
        olt_id: Some(other_olt.olt_id.clone()),
        port: Some(json!("4")),
        distance: Some(json!(1.2)),
        customer_email: text("budi@example.com"),
        ..OntPayload::default()
    };
    service
        .update_ont(&ctx(), &created.ont_id, replacement)
        .await
        .expect("update");

    let read = service.get_ont(&created.ont_id).await.expect("read");
    assert_eq!(read.serial_number, "HWTC1-B");
    assert_eq!(read.olt_id, other_olt.olt_id);
    assert_eq!(read.port, 4);
    assert_eq!(read.status, OntStatus::Pending);
    assert_eq!(read.mac_address, None);
    assert_eq!(read.rx_power, None);
    assert_eq!(read.distance, Some(1.2));
    assert_eq!(read.customer_name, None);
    assert_eq!(read.customer_email.as_deref(), Some("budi@example.com"));
    assert_eq!(read.install_date, None);
    assert_eq!(read.notes, None);
    assert_eq!(read.created_at_ms, created.created_at_ms);
}

#[tokio::test]
async fn odp_update_falls_back_to_policy_capacity() {
    let service = service_with_policy(DeletePolicy::Restrict);
    let olt = service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("olt");
    let mut original = odp_payload("ODP-1", Some(&olt.olt_id));
    original.capacity = Some(json!(16));
    original.status = text("MAINTENANCE");
    let created = service.create_odp(&ctx(), original).await.expect("create");
    assert_eq!(created.capacity, 16);

    let replacement = OdpPayload {
        name: text("ODP-1b"),
        location: text("Thamrin, Jakarta"),
        latitude: Some(json!(-6.19)),
        longitude: Some(json!("106.82")),
        ..OdpPayload::default()
    };
    service
        .update_odp(&ctx(), &created.odp_id, replacement)
        .await
        .expect("update");

    let read = service.get_odp(&created.odp_id).await.expect("read");
    assert_eq!(read.name, "ODP-1b");
    assert_eq!(read.location, "Thamrin, Jakarta");
    assert_eq!(read.latitude, -6.19);
    assert_eq!(read.longitude, 106.82);
    assert_eq!(read.capacity, 24);
    assert_eq!(read.status, OdpStatus::Active);
    assert_eq!(read.olt_id, None);
    assert_eq!(read.created_at_ms, created.created_at_ms);
}

#[tokio::test]
async fn cable_route_update_resets_omitted_fields() {
    let service = service();
    let mut original = route_payload(
        "Route A",
        json!([
            { "lat": -6.2, "lng": 106.8, "label": "OLT" },
            { "lat": -6.3, "lng": 106.9 }
        ]),
    );
    original.description = text("Backbone");
    original.status = text("maintenance");
    original.cable_type = text("copper");
    original.color = text("#FF0000");
    let created = service
        .create_cable_route(&ctx(), original)
        .await
        .expect("create");
    assert_eq!(created.coordinates[0].label.as_deref(), Some("OLT"));

    service
        .update_cable_route(
            &ctx(),
            &created.route_id,
            route_payload("Route A2", json!([[-6.1, 106.7], [-6.15, 106.75], [-6.2, 106.8]])),
        )
        .await
        .expect("update");

    let read = service
        .get_cable_route(&created.route_id)
        .await
        .expect("read");
    assert_eq!(read.name, "Route A2");
    assert_eq!(read.description, "");
    assert_eq!(read.status, CableRouteStatus::Active);
    assert_eq!(read.cable_type, CableType::Fiber);
    assert_eq!(read.color, None);
    assert_eq!(read.coordinates.len(), 3);
    assert!(read.coordinates.iter().all(|point| point.label.is_none()));
    assert_eq!(read.created_at_ms, created.created_at_ms);
}

#[tokio::test]
async fn olt_detail_counts_dependents() {
    let service = service();
    let olt = service
        .create_olt(&ctx(), olt_payload("OLT-1", "10.0.0.1"))
        .await
        .expect("olt");
    let empty = service
        .create_olt(&ctx(), olt_payload("OLT-2", "10.0.0.2"))
        .await
        .expect("empty olt");
    for serial in ["HWTC1", "HWTC2"] {
        service
            .create_ont(&ctx(), ont_payload(serial, &olt.olt_id))
            .await
            .expect("ont");
    }
    service
        .create_odp(&ctx(), odp_payload("ODP-1", Some(&olt.olt_id)))
        .await
        .expect("odp");

    let detail = service.get_olt_detail(&olt.olt_id).await.expect("detail");
    assert_eq!(detail.olt.name, "OLT-1");
    assert_eq!(detail.dependents.onts, 2);
    assert_eq!(detail.dependents.odps, 1);

    let detail = service.get_olt_detail(&empty.olt_id).await.expect("detail");
    assert!(detail.dependents.is_empty());

    let err = service
        .get_olt_detail("missing")
        .await
        .expect_err("missing");
    assert!(matches!(err, InventoryError::NotFound(_)));

    let names = service.olt_names().await.expect("names");
    assert_eq!(names.len(), 2);
    assert_eq!(names.get(&olt.olt_id).map(String::as_str), Some("OLT-1"));
}
