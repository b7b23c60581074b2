use crate::{AuthError, AuthTokens};
use domain::{Role, SessionContext};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// token 用途：access 只用于访问接口，refresh 只用于换取新 token。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: Role,
    exp: usize,
    #[serde(rename = "token_type")]
    kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jti: Option<String>,
}

impl Claims {
    fn require_kind(self, kind: TokenKind) -> Result<Self, AuthError> {
        if self.kind == kind {
            Ok(self)
        } else {
            Err(AuthError::TokenInvalid)
        }
    }

    fn session(&self) -> SessionContext {
        SessionContext::new(self.sub.clone(), self.email.clone(), self.role)
    }
}

/// 解析后的 refresh token：会话身份 + 绑定到账户上的 jti。
#[derive(Debug, Clone)]
pub struct RefreshGrant {
    pub session: SessionContext,
    pub jti: String,
}

/// JWT 生成与校验（HS256）。
pub struct JwtManager {
    secret: Vec<u8>,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

impl JwtManager {
    pub fn new(secret: String, access_ttl_seconds: u64, refresh_ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into_bytes(),
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// 为会话签发一对 token；refresh token 带新的随机 jti。
    pub fn issue_tokens(&self, ctx: &SessionContext) -> Result<AuthTokens, AuthError> {
        let issued_at = now_epoch_seconds();
        let refresh_jti = Uuid::new_v4().to_string();
        let access_token = self.sign(ctx, TokenKind::Access, issued_at, None)?;
        let refresh_token =
            self.sign(ctx, TokenKind::Refresh, issued_at, Some(refresh_jti.clone()))?;
        Ok(AuthTokens {
            access_token,
            refresh_token,
            refresh_jti,
            expires_at_ms: (issued_at + self.access_ttl_seconds) * 1000,
        })
    }

    pub fn decode_access(&self, token: &str) -> Result<SessionContext, AuthError> {
        let claims = self.verify(token)?.require_kind(TokenKind::Access)?;
        Ok(claims.session())
    }

    /// 解析 refresh token。缺少 jti 的 token 视为无效。
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshGrant, AuthError> {
        let claims = self.verify(token)?.require_kind(TokenKind::Refresh)?;
        let session = claims.session();
        let jti = claims.jti.ok_or(AuthError::TokenInvalid)?;
        Ok(RefreshGrant { session, jti })
    }

    fn sign(
        &self,
        ctx: &SessionContext,
        kind: TokenKind,
        issued_at: u64,
        jti: Option<String>,
    ) -> Result<String, AuthError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_seconds,
            TokenKind::Refresh => self.refresh_ttl_seconds,
        };
        let claims = Claims {
            sub: ctx.user_id.clone(),
            email: ctx.email.clone(),
            role: ctx.role,
            exp: (issued_at + ttl) as usize,
            kind,
            jti,
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })
    }
}

fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
