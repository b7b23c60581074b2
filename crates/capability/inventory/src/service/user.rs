use super::{InventoryService, Tracked, new_id};
use crate::error::InventoryError;
use crate::validation::Checker;
use api_contract::{UserPayload, UserQuery};
use domain::{Role, SessionContext, UserStatus, now_epoch_ms};
use olt_auth::{hash_password, normalize_email};
use olt_storage::{UserFilter, UserRecord, UserStore, UserUpdate};
use olt_telemetry::{record_create, record_delete, record_update};
use tracing::info;

const ENTITY: &str = "user";

/// 校验后的用户字段。`password` 仍是明文，哈希在写入前完成。
struct UserFields {
    email: String,
    name: String,
    role: Role,
    status: UserStatus,
    password: Option<String>,
}

/// 创建时口令必填；更新时口令为空表示保留原口令。
fn user_fields(
    payload: UserPayload,
    password_required: bool,
) -> Result<UserFields, InventoryError> {
    let mut checker = Checker::new();
    let email = checker.required_text("email", payload.email);
    if !email.is_empty() && !crate::validation::is_valid_email(&email) {
        checker.push("email", "email must be a valid email address");
    }
    let name = checker.required_text("name", payload.name);
    let password = match payload.password.filter(|password| !password.is_empty()) {
        Some(password) => Some(password),
        None if password_required => {
            checker.push("password", "password is required");
            None
        }
        None => None,
    };
    let role = checker.tag_or("role", payload.role, Role::Viewer);
    let status = checker.tag_or("status", payload.status, UserStatus::Active);
    checker.finish()?;

    Ok(UserFields {
        email: normalize_email(&email),
        name,
        role,
        status,
        password,
    })
}

fn hash(password: &str) -> Result<String, InventoryError> {
    hash_password(password).map_err(|err| InventoryError::Internal(err.to_string()))
}

fn user_filter(query: UserQuery) -> Result<UserFilter, InventoryError> {
    let mut checker = Checker::new();
    let role = checker.optional_tag("role", query.role);
    let status = checker.optional_tag("status", query.status);
    checker.finish()?;
    Ok(UserFilter { role, status })
}

fn user_not_found() -> InventoryError {
    InventoryError::NotFound("User not found".to_string())
}

impl InventoryService {
    /// 按创建时间倒序列出用户。
    pub async fn list_users(&self, query: UserQuery) -> Result<Vec<UserRecord>, InventoryError> {
        let filter = user_filter(query).tracked(ENTITY, "list")?;
        self.store.list_users(&filter).await.tracked(ENTITY, "list")
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserRecord, InventoryError> {
        self.store
            .find_user(user_id)
            .await
            .tracked(ENTITY, "get")?
            .ok_or_else(user_not_found)
            .tracked(ENTITY, "get")
    }

    /// 创建用户，口令以 argon2 哈希保存。
    pub async fn create_user(
        &self,
        ctx: &SessionContext,
        payload: UserPayload,
    ) -> Result<UserRecord, InventoryError> {
        let fields = user_fields(payload, true).tracked(ENTITY, "create")?;
        let password_hash = hash(fields.password.as_deref().unwrap_or_default())
            .tracked(ENTITY, "create")?;
        let now_ms = now_epoch_ms();
        let record = UserRecord {
            user_id: new_id(),
            email: fields.email,
            password_hash,
            name: fields.name,
            role: fields.role,
            status: fields.status,
            last_login_ms: None,
            refresh_jti: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        let record = self
            .store
            .create_user(record)
            .await
            .tracked(ENTITY, "create")?;
        record_create();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.user_id,
            user_id = %ctx.user_id,
            role = %record.role,
            "user_created"
        );
        Ok(record)
    }

    /// 更新用户。只有提供了新口令才重新哈希，并作废已签发的 refresh token。
    pub async fn update_user(
        &self,
        ctx: &SessionContext,
        user_id: &str,
        payload: UserPayload,
    ) -> Result<UserRecord, InventoryError> {
        let fields = user_fields(payload, false).tracked(ENTITY, "update")?;
        let password_hash = match fields.password.as_deref() {
            Some(password) => Some(hash(password).tracked(ENTITY, "update")?),
            None => None,
        };
        let password_changed = password_hash.is_some();
        let update = UserUpdate {
            email: fields.email,
            name: fields.name,
            role: fields.role,
            status: fields.status,
            password_hash,
        };
        let record = self
            .store
            .update_user(user_id, update)
            .await
            .tracked(ENTITY, "update")?
            .ok_or_else(user_not_found)
            .tracked(ENTITY, "update")?;
        record_update();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %record.user_id,
            user_id = %ctx.user_id,
            password_changed,
            "user_updated"
        );
        Ok(record)
    }

    pub async fn delete_user(
        &self,
        ctx: &SessionContext,
        user_id: &str,
    ) -> Result<(), InventoryError> {
        let deleted = self
            .store
            .delete_user(user_id)
            .await
            .tracked(ENTITY, "delete")?;
        if !deleted {
            return Err(user_not_found()).tracked(ENTITY, "delete");
        }
        record_delete();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            id = %user_id,
            user_id = %ctx.user_id,
            "user_deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_required_only_on_create() {
        let payload = UserPayload {
            email: Some("Ops@SmartOLT.com ".to_string()),
            name: Some("Ops".to_string()),
            ..UserPayload::default()
        };
        assert!(user_fields(payload.clone(), true).is_err());

        let fields = user_fields(payload, false).expect("valid");
        assert_eq!(fields.email, "ops@smartolt.com");
        assert_eq!(fields.role, Role::Viewer);
        assert_eq!(fields.status, UserStatus::Active);
        assert!(fields.password.is_none());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = user_fields(
            UserPayload {
                email: Some("ops".to_string()),
                name: Some("Ops".to_string()),
                password: Some("secret".to_string()),
                ..UserPayload::default()
            },
            true,
        )
        .err()
        .expect("invalid email");
        assert!(matches!(err, InventoryError::Validation(fields) if fields[0].field == "email"));
    }
}
