//! 请求追踪与会话守卫中间件
//!
//! - request_context：为每个请求生成 request_id/trace_id，写入响应头并挂到日志 span
//! - require_session：校验 Bearer access token，把 SessionContext 注入请求扩展
//!
//! 会话守卫挂在受保护路由上，每个请求只校验一次；handler 通过
//! `Extension<SessionContext>` 获取当前操作人。

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use olt_auth::AuthError;
use olt_telemetry::new_request_ids;
use tracing::{Instrument, info_span, warn};

use crate::AppState;
use crate::utils::response::{auth_error, internal_auth_error};

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// 会话守卫：缺少或无效的 token 一律返回 401
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return auth_error();
    };
    let ctx = match state.auth.verify_access_token(token) {
        Ok(ctx) => ctx,
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => {
            warn!("session rejected");
            return auth_error();
        }
        Err(err) => return internal_auth_error(err),
    };
    req.extensions_mut().insert(ctx);
    next.run(req).await
}
