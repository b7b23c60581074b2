//! 用户内存存储实现
//!
//! 邮箱唯一；列表按创建时间倒序。

use super::{InMemoryStore, sort_newest_first};
use crate::error::StorageError;
use crate::models::{UserFilter, UserRecord, UserUpdate};
use crate::traits::UserStore;
use domain::now_epoch_ms;

#[async_trait::async_trait]
impl UserStore for InMemoryStore {
    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<UserRecord> = tables
            .users
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        sort_newest_first(&mut items, |item| (item.created_at_ms, item.user_id.as_str()));
        Ok(items)
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.read()?.users.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|item| item.email == email)
            .cloned())
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        let mut tables = self.write()?;
        if tables.users.contains_key(&record.user_id) {
            return Err(StorageError::conflict("user exists"));
        }
        if tables.users.values().any(|item| item.email == record.email) {
            return Err(StorageError::conflict("email already registered"));
        }
        tables.users.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_user(
        &self,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<Option<UserRecord>, StorageError> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(user_id) {
            return Ok(None);
        }
        if tables
            .users
            .values()
            .any(|item| item.user_id != user_id && item.email == update.email)
        {
            return Err(StorageError::conflict("email already registered"));
        }
        let Some(user) = tables.users.get_mut(user_id) else {
            return Ok(None);
        };
        user.apply(update, now_epoch_ms());
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError> {
        Ok(self.write()?.users.remove(user_id).is_some())
    }

    async fn touch_last_login(&self, user_id: &str, at_ms: i64) -> Result<bool, StorageError> {
        let mut tables = self.write()?;
        match tables.users.get_mut(user_id) {
            Some(user) => {
                user.last_login_ms = Some(at_ms);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_refresh_jti(
        &self,
        user_id: &str,
        jti: Option<&str>,
    ) -> Result<bool, StorageError> {
        let mut tables = self.write()?;
        match tables.users.get_mut(user_id) {
            Some(user) => {
                user.refresh_jti = jti.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn rotate_refresh_jti(
        &self,
        user_id: &str,
        expected: &str,
        next: &str,
    ) -> Result<bool, StorageError> {
        let mut tables = self.write()?;
        match tables.users.get_mut(user_id) {
            Some(user) if user.refresh_jti.as_deref() == Some(expected) => {
                user.refresh_jti = Some(next.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
