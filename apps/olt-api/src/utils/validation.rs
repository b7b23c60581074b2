//! 请求体与查询参数解析
//!
//! axum 的 `Json`/`Query` 提取失败时默认返回纯文本错误；这里统一转换成
//! `{ "error": ... }` 的 400 响应，并计入校验失败次数。

use crate::utils::response::bad_request_error;
use axum::{
    Json,
    extract::{
        Query,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Response,
};
use olt_telemetry::record_validation_failure;

/// 解析 JSON 请求体
pub fn parse_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            record_validation_failure();
            tracing::warn!(error = %rejection.body_text(), "invalid json body");
            Err(bad_request_error("Invalid JSON body"))
        }
    }
}

/// 解析查询参数
pub fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Response> {
    match query {
        Ok(Query(value)) => Ok(value),
        Err(rejection) => {
            record_validation_failure();
            Err(bad_request_error(rejection.body_text()))
        }
    }
}
