use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use olt_api::{AppState, build_app, prepare_accounts};
use olt_auth::{AuthService, JwtManager};
use olt_config::AppConfig;
use olt_inventory::{
    DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, InventoryService, seed_demo_data,
};
use olt_storage::{InMemoryStore, InventoryStore};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> Router {
    let store: Arc<dyn InventoryStore> = Arc::new(InMemoryStore::new());
    let inventory = Arc::new(InventoryService::new(store.clone()));
    seed_demo_data(&inventory).await.expect("seed");
    let jwt = JwtManager::new("test-secret".to_string(), 3600, 7200);
    build_app(AppState {
        inventory,
        auth: Arc::new(AuthService::new(store, jwt)),
        storage: "memory",
    })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": DEMO_ADMIN_EMAIL, "password": DEMO_ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["accessToken"].as_str().expect("access token").to_string()
}

#[tokio::test]
async fn health_is_public_and_tagged_with_request_ids() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers().contains_key("x-trace-id"));
}

#[tokio::test]
async fn inventory_routes_require_a_session() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/olts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send(&app, Method::GET, "/api/olts", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": DEMO_ADMIN_EMAIL, "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn refresh_token_is_single_use() {
    let app = app().await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": DEMO_ADMIN_EMAIL, "password": DEMO_ADMIN_PASSWORD })),
    )
    .await;
    let refresh = body["refreshToken"].as_str().expect("refresh").to_string();
    assert!(body["user"].get("passwordHash").is_none());

    let (status, rotated) = send(
        &app,
        Method::POST,
        "/api/refresh-token",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(rotated["accessToken"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/refresh-token",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn olt_crud_over_http() {
    let app = app().await;
    let token = login(&app).await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/olts",
        Some(&token),
        Some(json!({
            "name": "OLT-Surabaya-01",
            "ipAddress": "192.168.1.102",
            "model": "OLT-8000",
            "vendor": "Huawei",
            "location": "Surabaya",
            "totalPorts": "8",
            "lat": "-7.2575",
            "lng": 112.7521
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "OFFLINE");
    assert_eq!(created["totalPorts"], 8);
    assert_eq!(created["latitude"], -7.2575);
    let id = created["id"].as_str().expect("id").to_string();

    let (status, duplicate) = send(
        &app,
        Method::POST,
        "/api/olts",
        Some(&token),
        Some(json!({
            "name": "Another",
            "ipAddress": "192.168.1.102",
            "model": "OLT-8000",
            "vendor": "ZTE",
            "location": "Surabaya"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(duplicate["error"].is_string());

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/olts/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "OLT-Surabaya-01");

    let (status, listed) = send(
        &app,
        Method::GET,
        "/api/olts?status=OFFLINE",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/olts/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, missing) = send(
        &app,
        Method::DELETE,
        &format!("/api/olts/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"], "OLT not found");
}

#[tokio::test]
async fn validation_failures_carry_field_detail() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/cable-routes",
        Some(&token),
        Some(json!({
            "name": "Route Short",
            "startPoint": "A",
            "endPoint": "B",
            "coordinates": [[-6.2, 106.8]]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], "coordinates");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/odps",
        Some(&token),
        Some(json!({ "name": "ODP X", "location": "X", "latitude": 95, "longitude": 106.8 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "latitude must be between -90 and 90");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/olts")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ont_with_unknown_olt_is_not_found() {
    let app = app().await;
    let token = login(&app).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/onts",
        Some(&token),
        Some(json!({ "serialNumber": "HWTC00000001", "oltId": "missing", "port": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "OLT not found");
}

#[tokio::test]
async fn seeded_olt_delete_is_restricted() {
    let app = app().await;
    let token = login(&app).await;
    let (_, olts) = send(&app, Method::GET, "/api/olts", Some(&token), None).await;
    let id = olts[0]["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/olts/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn olt_detail_counts_and_devices_name_their_olt() {
    let app = app().await;
    let token = login(&app).await;
    let (_, olts) = send(&app, Method::GET, "/api/olts", Some(&token), None).await;
    let jakarta = olts
        .as_array()
        .expect("olt list")
        .iter()
        .find(|olt| olt["name"] == "OLT-Jakarta-01")
        .expect("jakarta");
    assert!(jakarta.get("_count").is_none());
    let id = jakarta["id"].as_str().expect("id").to_string();

    let uri = format!("/api/olts/{id}");
    let (status, detail) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["_count"], json!({ "onts": 2, "odps": 2 }));

    let uri = format!("/api/onts?oltId={id}");
    let (_, onts) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(onts.as_array().map(Vec::len), Some(2));
    assert_eq!(onts[0]["olt"], json!({ "id": id, "name": "OLT-Jakarta-01" }));

    let uri = format!("/api/odps?oltId={id}");
    let (_, odps) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(odps[0]["olt"]["name"], "OLT-Jakarta-01");

    let (_, dashboard) = send(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert!(dashboard["recentOnts"][0]["olt"]["name"].is_string());
}

#[tokio::test]
async fn alarm_resolve_and_dashboard() {
    let app = app().await;
    let token = login(&app).await;

    let (status, dashboard) = send(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["olts"]["total"], 2);
    assert_eq!(dashboard["activeAlarms"], 1);
    let alarm_id = dashboard["recentAlarms"][0]["id"]
        .as_str()
        .expect("alarm id")
        .to_string();

    let (status, resolved) = send(
        &app,
        Method::POST,
        &format!("/api/alarms/{alarm_id}/resolve"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "RESOLVED");
    assert!(resolved["resolvedAt"].is_i64());

    let (_, dashboard) = send(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(dashboard["activeAlarms"], 0);
}

#[tokio::test]
async fn settings_save_and_read_back() {
    let app = app().await;
    let token = login(&app).await;

    let (status, saved) = send(
        &app,
        Method::POST,
        "/api/settings",
        Some(&token),
        Some(json!({ "company_name": "Fiber Co", "poll_interval": 45 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["saved"], 2);

    let (status, settings) = send(&app, Method::GET, "/api/settings", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["company_name"], "Fiber Co");
    assert_eq!(settings["poll_interval"], "45");
    assert_eq!(settings["snmp_community"], "public");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/settings",
        Some(&token),
        Some(json!({ "nested": { "a": 1 } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bootstrap_admin_from_config_can_log_in() {
    let config = AppConfig::from_lookup(|key| match key {
        "OLT_JWT_SECRET" => Some("test-secret".to_string()),
        "OLT_BOOTSTRAP_ADMIN_EMAIL" => Some("root@example.com".to_string()),
        "OLT_BOOTSTRAP_ADMIN_PASSWORD" => Some("Root123!".to_string()),
        _ => None,
    })
    .expect("config");
    let store: Arc<dyn InventoryStore> = Arc::new(InMemoryStore::new());
    let inventory = Arc::new(InventoryService::new(store.clone()));
    prepare_accounts(&inventory, &config).await.expect("prepare");
    prepare_accounts(&inventory, &config).await.expect("prepare twice");

    let jwt = JwtManager::new(config.jwt_secret.clone(), 3600, 7200);
    let app = build_app(AppState {
        inventory,
        auth: Arc::new(AuthService::new(store, jwt)),
        storage: "memory",
    });
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "root@example.com", "password": "Root123!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "ADMIN");

    let token = body["accessToken"].as_str().expect("access token");
    let (_, users) = send(&app, Method::GET, "/api/users", Some(token), None).await;
    assert_eq!(users.as_array().map(Vec::len), Some(1));
}
