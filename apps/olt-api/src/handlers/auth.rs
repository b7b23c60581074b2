//! 认证相关 handlers：健康检查、登录、刷新 token
//!
//! ## 提供的端点（均无需认证）
//! - `GET /api/health` - 健康检查，返回存储后端标识
//! - `POST /api/login` - 邮箱 + 口令登录，返回 access/refresh token 与用户信息
//! - `POST /api/refresh-token` - 使用 refresh token 换取新的 token 对
//!
//! ## Token 刷新
//! refresh token 只能使用一次：换取成功后旧 token 立即失效。

use crate::AppState;
use crate::utils::parse_json;
use crate::utils::response::{
    account_disabled_error, auth_error, internal_auth_error, invalid_credentials_error, user_to_dto,
};
use api_contract::{
    HealthDto, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use olt_auth::AuthError;
use olt_telemetry::{record_login, record_login_failure};

/// 健康检查端点
pub async fn health(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(HealthDto {
            status: "ok".to_string(),
            storage: state.storage.to_string(),
        }),
    )
        .into_response()
}

/// 用户登录
///
/// 邮箱不存在与口令错误返回同样的 401，停用账户单独提示。
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let req = match parse_json(body) {
        Ok(req) => req,
        Err(response) => return response,
    };
    match state.auth.login(&req.email, &req.password).await {
        Ok((user, tokens)) => {
            record_login();
            let response = LoginResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                expires: tokens.expires_at_ms,
                user: user_to_dto(user),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            record_login_failure();
            invalid_credentials_error()
        }
        Err(AuthError::AccountDisabled) => {
            record_login_failure();
            account_disabled_error()
        }
        Err(err) => internal_auth_error(err),
    }
}

/// 刷新 token
pub async fn refresh_token(
    State(state): State<AppState>,
    body: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Response {
    let req = match parse_json(body) {
        Ok(req) => req,
        Err(response) => return response,
    };
    match state.auth.refresh(&req.refresh_token).await {
        Ok(tokens) => {
            let response = RefreshTokenResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                expires: tokens.expires_at_ms,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => auth_error(),
        Err(AuthError::AccountDisabled) => account_disabled_error(),
        Err(err) => internal_auth_error(err),
    }
}
