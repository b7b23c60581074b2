//! 认证能力：邮箱登录、JWT 生成与校验、refresh token 轮换。

mod jwt;
mod password;

use async_trait::async_trait;
use domain::{SessionContext, UserStatus, now_epoch_ms};
use olt_storage::{StorageError, UserRecord, UserStore};
use std::sync::Arc;

pub use jwt::{JwtManager, RefreshGrant};
pub use password::{hash_password, verify_password};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account disabled")]
    AccountDisabled,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// 登录/刷新返回的 token 结构。
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_jti: String,
    /// access token 过期时间（毫秒）
    pub expires_at_ms: u64,
}

/// 邮箱统一去空格、转小写后再查找与保存。
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn session_of(user: &UserRecord) -> SessionContext {
    SessionContext::new(user.user_id.clone(), user.email.clone(), user.role)
}

/// 认证服务实现（基于 UserStore + JWT）。
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    jwt: JwtManager,
}

impl AuthService {
    pub fn new(user_store: Arc<dyn UserStore>, jwt: JwtManager) -> Self {
        Self { user_store, jwt }
    }

    /// 邮箱 + 口令登录。
    ///
    /// 停用账户即使口令正确也拒绝；成功后记录最后登录时间。
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthTokens), AuthError> {
        let email = normalize_email(email);
        let mut user = self
            .user_store
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(&user.password_hash, password)? {
            tracing::warn!(email = %email, "login rejected: bad password");
            return Err(AuthError::InvalidCredentials);
        }
        if user.status == UserStatus::Inactive {
            tracing::warn!(user_id = %user.user_id, "login rejected: account disabled");
            return Err(AuthError::AccountDisabled);
        }

        let now_ms = now_epoch_ms();
        self.user_store
            .touch_last_login(&user.user_id, now_ms)
            .await?;
        user.last_login_ms = Some(now_ms);

        let tokens = self.issue_bound(&user).await?;
        tracing::info!(user_id = %user.user_id, "login succeeded");
        Ok((user, tokens))
    }

    pub fn verify_access_token(&self, token: &str) -> Result<SessionContext, AuthError> {
        self.jwt.decode_access(token)
    }

    /// 使用 refresh token 换取新 token。
    ///
    /// 每个 refresh token 只能使用一次；新 token 按账户当前角色签发。
    /// 改绑通过存储层的比较写入完成，并发兑换同一个 token 只有一个成功。
    pub async fn refresh(&self, token: &str) -> Result<AuthTokens, AuthError> {
        let grant = self.jwt.decode_refresh(token)?;
        let user = self
            .user_store
            .find_user(&grant.session.user_id)
            .await?
            .ok_or(AuthError::TokenInvalid)?;
        if user.status == UserStatus::Inactive {
            return Err(AuthError::AccountDisabled);
        }

        let tokens = self.jwt.issue_tokens(&session_of(&user))?;
        let rotated = self
            .user_store
            .rotate_refresh_jti(&user.user_id, &grant.jti, &tokens.refresh_jti)
            .await?;
        if !rotated {
            tracing::warn!(user_id = %user.user_id, "refresh rejected: token already rotated");
            return Err(AuthError::TokenInvalid);
        }
        Ok(tokens)
    }

    /// 签发新 token 并把 refresh jti 绑定到账户，之前的 refresh token 随之失效。
    async fn issue_bound(&self, user: &UserRecord) -> Result<AuthTokens, AuthError> {
        let tokens = self.jwt.issue_tokens(&session_of(user))?;
        let bound = self
            .user_store
            .set_refresh_jti(&user.user_id, Some(&tokens.refresh_jti))
            .await?;
        if !bound {
            return Err(AuthError::Internal(format!(
                "user {} vanished while binding refresh token",
                user.user_id
            )));
        }
        Ok(tokens)
    }
}

/// 认证能力 trait，便于替换实现与测试。
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthTokens), AuthError>;
    fn verify_access_token(&self, token: &str) -> Result<SessionContext, AuthError>;
    async fn refresh(&self, token: &str) -> Result<AuthTokens, AuthError>;
}

#[async_trait]
impl Authenticator for AuthService {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthTokens), AuthError> {
        self.login(email, password).await
    }

    fn verify_access_token(&self, token: &str) -> Result<SessionContext, AuthError> {
        self.verify_access_token(token)
    }

    async fn refresh(&self, token: &str) -> Result<AuthTokens, AuthError> {
        self.refresh(token).await
    }
}
