//! 操作计数快照。
//!
//! - GET /api/metrics

use api_contract::MetricsDto;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use olt_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(MetricsDto {
            creates: snapshot.creates,
            updates: snapshot.updates,
            deletes: snapshot.deletes,
            validation_failures: snapshot.validation_failures,
            conflicts: snapshot.conflicts,
            not_found: snapshot.not_found,
            internal_failures: snapshot.internal_failures,
            logins: snapshot.logins,
            login_failures: snapshot.login_failures,
        }),
    )
        .into_response()
}
