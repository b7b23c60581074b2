//! 资产服务错误类型。

use olt_storage::{StorageError, StorageErrorKind};
use std::fmt;

/// 单个字段的校验错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// 资产服务错误。
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl InventoryError {
    /// 单字段校验失败。
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|field| field.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<StorageError> for InventoryError {
    fn from(err: StorageError) -> Self {
        match err.kind() {
            StorageErrorKind::Conflict => Self::Conflict(err.message().to_string()),
            // 外键目标不存在按 NotFound 对外报告
            StorageErrorKind::ForeignKey => Self::NotFound(err.message().to_string()),
            StorageErrorKind::Internal => Self::Internal(err.message().to_string()),
        }
    }
}
