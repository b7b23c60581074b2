use std::sync::Arc;

use domain::{Role, UserStatus, now_epoch_ms};
use olt_auth::{AuthError, AuthService, JwtManager, hash_password};
use olt_storage::{
    InMemoryStore, StorageError, UserFilter, UserRecord, UserStore, UserUpdate,
};

async fn store_with_user(status: UserStatus) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    let now = now_epoch_ms();
    store
        .create_user(UserRecord {
            user_id: "user-1".to_string(),
            email: "admin@smartolt.com".to_string(),
            password_hash: hash_password("Admin123!").expect("hash"),
            name: "Administrator".to_string(),
            role: Role::Admin,
            status,
            last_login_ms: None,
            refresh_jti: None,
            created_at_ms: now,
            updated_at_ms: now,
        })
        .await
        .expect("create");
    store
}

fn auth_for(store: Arc<InMemoryStore>) -> AuthService {
    AuthService::new(store, JwtManager::new("secret".to_string(), 3600, 7200))
}

#[tokio::test]
async fn refresh_token_is_single_use_after_rotation() {
    let auth = auth_for(store_with_user(UserStatus::Active).await);

    let (_, tokens1) = auth
        .login("admin@smartolt.com", "Admin123!")
        .await
        .expect("login");
    let tokens2 = auth
        .refresh(&tokens1.refresh_token)
        .await
        .expect("refresh");
    assert_ne!(tokens1.refresh_token, tokens2.refresh_token);

    let result = auth.refresh(&tokens1.refresh_token).await;
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[tokio::test]
async fn login_is_case_insensitive_and_stamps_last_login() {
    let store = store_with_user(UserStatus::Active).await;
    let auth = auth_for(store.clone());

    let (user, tokens) = auth
        .login("  Admin@SmartOLT.com ", "Admin123!")
        .await
        .expect("login");
    assert!(user.last_login_ms.is_some());

    let stored = store.find_user("user-1").await.expect("find").expect("user");
    assert_eq!(stored.last_login_ms, user.last_login_ms);

    let ctx = auth
        .verify_access_token(&tokens.access_token)
        .expect("verify");
    assert_eq!(ctx.user_id, "user-1");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let auth = auth_for(store_with_user(UserStatus::Active).await);
    assert!(matches!(
        auth.login("admin@smartolt.com", "nope").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        auth.login("ghost@smartolt.com", "Admin123!").await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn inactive_account_cannot_login() {
    let auth = auth_for(store_with_user(UserStatus::Inactive).await);
    assert!(matches!(
        auth.login("admin@smartolt.com", "Admin123!").await,
        Err(AuthError::AccountDisabled)
    ));
}

/// 每次读取账户后让出调度，模拟真实数据库的往返等待。
struct YieldingStore {
    inner: Arc<InMemoryStore>,
}

#[async_trait::async_trait]
impl UserStore for YieldingStore {
    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserRecord>, StorageError> {
        self.inner.list_users(filter).await
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let found = self.inner.find_user(user_id).await;
        tokio::task::yield_now().await;
        found
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        self.inner.find_user_by_email(email).await
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        self.inner.create_user(record).await
    }

    async fn update_user(
        &self,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<Option<UserRecord>, StorageError> {
        self.inner.update_user(user_id, update).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError> {
        self.inner.delete_user(user_id).await
    }

    async fn touch_last_login(&self, user_id: &str, at_ms: i64) -> Result<bool, StorageError> {
        self.inner.touch_last_login(user_id, at_ms).await
    }

    async fn set_refresh_jti(
        &self,
        user_id: &str,
        jti: Option<&str>,
    ) -> Result<bool, StorageError> {
        self.inner.set_refresh_jti(user_id, jti).await
    }

    async fn rotate_refresh_jti(
        &self,
        user_id: &str,
        expected: &str,
        next: &str,
    ) -> Result<bool, StorageError> {
        tokio::task::yield_now().await;
        self.inner.rotate_refresh_jti(user_id, expected, next).await
    }
}

#[tokio::test]
async fn concurrent_refresh_with_one_token_succeeds_once() {
    let store = YieldingStore {
        inner: store_with_user(UserStatus::Active).await,
    };
    let auth = AuthService::new(
        Arc::new(store),
        JwtManager::new("secret".to_string(), 3600, 7200),
    );
    let (_, tokens) = auth
        .login("admin@smartolt.com", "Admin123!")
        .await
        .expect("login");

    let (first, second) = tokio::join!(
        auth.refresh(&tokens.refresh_token),
        auth.refresh(&tokens.refresh_token)
    );
    let redeemed = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(redeemed, 1);
    let rejected = if first.is_ok() { second } else { first };
    assert!(matches!(rejected, Err(AuthError::TokenInvalid)));
}
