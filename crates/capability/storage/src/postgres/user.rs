//! Postgres 用户存储实现

use super::{PgStore, parse_tag};
use crate::error::StorageError;
use crate::models::{UserFilter, UserRecord, UserUpdate};
use crate::traits::UserStore;
use domain::now_epoch_ms;
use sqlx::Row;
use sqlx::postgres::PgRow;

const USER_COLUMNS: &str = "user_id, email, password_hash, name, role, status, last_login_ms, \
     refresh_jti, created_at_ms, updated_at_ms";

fn user_from_row(row: &PgRow) -> Result<UserRecord, StorageError> {
    let role: String = row.try_get("role")?;
    let status: String = row.try_get("status")?;
    Ok(UserRecord {
        user_id: row.try_get("user_id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        name: row.try_get("name")?,
        role: parse_tag(&role)?,
        status: parse_tag(&status)?,
        last_login_ms: row.try_get("last_login_ms")?,
        refresh_jti: row.try_get("refresh_jti")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl UserStore for PgStore {
    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserRecord>, StorageError> {
        let sql = format!(
            "select {USER_COLUMNS} from users \
             where ($1::text is null or role = $1) and ($2::text is null or status = $2) \
             order by created_at_ms desc, user_id asc"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.role.map(|role| role.as_str()))
            .bind(filter.status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let sql = format!("select {USER_COLUMNS} from users where user_id = $1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(user_from_row(&row)?))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let sql = format!("select {USER_COLUMNS} from users where email = $1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(user_from_row(&row)?))
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        sqlx::query(
            "insert into users (user_id, email, password_hash, name, role, status, \
             last_login_ms, refresh_jti, created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&record.user_id)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.name)
        .bind(record.role.as_str())
        .bind(record.status.as_str())
        .bind(record.last_login_ms)
        .bind(&record.refresh_jti)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_user(
        &self,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<Option<UserRecord>, StorageError> {
        // 修改口令时作废已签发的 refresh token
        let sql = format!(
            "update users set email = $2, name = $3, role = $4, status = $5, \
             password_hash = coalesce($6, password_hash), \
             refresh_jti = case when $6::text is null then refresh_jti else null end, \
             updated_at_ms = $7 \
             where user_id = $1 returning {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(&update.email)
            .bind(&update.name)
            .bind(update.role.as_str())
            .bind(update.status.as_str())
            .bind(update.password_hash)
            .bind(now_epoch_ms())
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(user_from_row(&row)?))
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from users where user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn touch_last_login(&self, user_id: &str, at_ms: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("update users set last_login_ms = $2 where user_id = $1")
            .bind(user_id)
            .bind(at_ms)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_refresh_jti(
        &self,
        user_id: &str,
        jti: Option<&str>,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update users set refresh_jti = $2 where user_id = $1")
            .bind(user_id)
            .bind(jti)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn rotate_refresh_jti(
        &self,
        user_id: &str,
        expected: &str,
        next: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "update users set refresh_jti = $3 where user_id = $1 and refresh_jti = $2",
        )
        .bind(user_id)
        .bind(expected)
        .bind(next)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
