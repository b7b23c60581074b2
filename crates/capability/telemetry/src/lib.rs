//! 追踪、请求 ID 生成与资产操作计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 操作计数快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
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

/// 进程内操作计数。
pub struct TelemetryMetrics {
    creates: AtomicU64,
    updates: AtomicU64,
    deletes: AtomicU64,
    validation_failures: AtomicU64,
    conflicts: AtomicU64,
    not_found: AtomicU64,
    internal_failures: AtomicU64,
    logins: AtomicU64,
    login_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            creates: AtomicU64::new(0),
            updates: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            conflicts: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            internal_failures: AtomicU64::new(0),
            logins: AtomicU64::new(0),
            login_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            creates: self.creates.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            internal_failures: self.internal_failures.load(Ordering::Relaxed),
            logins: self.logins.load(Ordering::Relaxed),
            login_failures: self.login_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录创建成功次数。
pub fn record_create() {
    metrics().creates.fetch_add(1, Ordering::Relaxed);
}

/// 记录更新成功次数。
pub fn record_update() {
    metrics().updates.fetch_add(1, Ordering::Relaxed);
}

/// 记录删除成功次数。
pub fn record_delete() {
    metrics().deletes.fetch_add(1, Ordering::Relaxed);
}

/// 记录校验失败次数。
pub fn record_validation_failure() {
    metrics()
        .validation_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录唯一键冲突次数。
pub fn record_conflict() {
    metrics().conflicts.fetch_add(1, Ordering::Relaxed);
}

/// 记录目标不存在次数。
pub fn record_not_found() {
    metrics().not_found.fetch_add(1, Ordering::Relaxed);
}

/// 记录内部错误次数。
pub fn record_internal_failure() {
    metrics().internal_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录登录成功次数。
pub fn record_login() {
    metrics().logins.fetch_add(1, Ordering::Relaxed);
}

/// 记录登录失败次数。
pub fn record_login_failure() {
    metrics().login_failures.fetch_add(1, Ordering::Relaxed);
}
