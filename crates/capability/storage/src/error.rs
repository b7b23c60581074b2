//! 存储层错误类型
//!
//! 定义统一的存储错误类型，用于封装底层错误：
//! - 唯一约束冲突（Conflict）
//! - 外键目标不存在（ForeignKey）
//! - SQL 执行、连接、锁等其他错误（Internal）

/// 存储错误分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    Conflict,
    ForeignKey,
    Internal,
}

#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Internal,
            message: message.into(),
        }
    }

    /// 唯一键冲突。
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Conflict,
            message: message.into(),
        }
    }

    /// 外键引用的记录不存在。
    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::ForeignKey,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Self::conflict(conflict_message(db.constraint()));
            }
            if db.is_foreign_key_violation() {
                return match db.constraint() {
                    Some(target) if target.contains("olt_id") => Self::foreign_key("OLT not found"),
                    Some(target) => {
                        Self::foreign_key(format!("referenced record missing ({target})"))
                    }
                    None => Self::foreign_key("referenced record missing"),
                };
            }
        }
        Self::new(err.to_string())
    }
}

/// 唯一约束名转为与内存存储一致的冲突信息。约束名取 Postgres 的默认命名。
fn conflict_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("olts_ip_address_key") => "ip address already in use".to_string(),
        Some("onts_serial_number_key") => "serial number already registered".to_string(),
        Some("odps_name_key") => "odp name already in use".to_string(),
        Some("cable_routes_name_key") => "cable route name already in use".to_string(),
        Some("users_email_key") => "email already registered".to_string(),
        Some(other) => format!("duplicate value violates {other}"),
        None => "duplicate value violates unique key".to_string(),
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("corrupt json column: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_constraints_read_like_memory_store_conflicts() {
        assert_eq!(
            conflict_message(Some("olts_ip_address_key")),
            "ip address already in use"
        );
        assert_eq!(
            conflict_message(Some("onts_serial_number_key")),
            "serial number already registered"
        );
        assert_eq!(conflict_message(Some("odps_name_key")), "odp name already in use");
        assert_eq!(
            conflict_message(Some("cable_routes_name_key")),
            "cable route name already in use"
        );
        assert_eq!(
            conflict_message(Some("users_email_key")),
            "email already registered"
        );
        assert_eq!(
            conflict_message(Some("olts_pkey")),
            "duplicate value violates olts_pkey"
        );
        assert_eq!(
            conflict_message(None),
            "duplicate value violates unique key"
        );
    }
}
