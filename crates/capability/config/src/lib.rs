//! 应用运行配置加载。
//!
//! 所有配置来自 `OLT_` 前缀的环境变量；`main` 启动时先用 dotenvy 加载 `.env`。

use domain::DeletePolicy;
use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 首个管理员账户：账户表为空时按此创建。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 未设置时使用内存存储
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// 账户表为空时写入演示数据
    pub seed_demo: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub jwt_secret: String,
    pub jwt_access_ttl_seconds: u64,
    pub jwt_refresh_ttl_seconds: u64,
    pub odp_default_capacity: i32,
    pub delete_policy: DeletePolicy,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意 key → value 来源读取配置（测试时可传入固定映射）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reader = Reader { lookup };
        let jwt_secret = reader
            .optional("OLT_JWT_SECRET")
            .ok_or_else(|| ConfigError::Missing("OLT_JWT_SECRET".to_string()))?;
        let jwt_access_ttl_seconds = reader.u64_with_default("OLT_JWT_ACCESS_TTL_SECONDS", 3600)?;
        let jwt_refresh_ttl_seconds =
            reader.u64_with_default("OLT_JWT_REFRESH_TTL_SECONDS", 604_800)?;
        let http_addr = reader
            .optional("OLT_HTTP_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let database_url = reader.optional("OLT_DATABASE_URL");
        let database_max_connections =
            reader.u32_with_default("OLT_DATABASE_MAX_CONNECTIONS", 8)?;
        let seed_demo = reader.bool_with_default("OLT_SEED_DEMO", false);
        // 邮箱与口令必须成对出现
        let bootstrap_admin = match (
            reader.optional("OLT_BOOTSTRAP_ADMIN_EMAIL"),
            reader.optional("OLT_BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Missing(
                    "OLT_BOOTSTRAP_ADMIN_PASSWORD".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(ConfigError::Missing("OLT_BOOTSTRAP_ADMIN_EMAIL".to_string()));
            }
        };
        let odp_default_capacity = reader.i32_with_default("OLT_ODP_DEFAULT_CAPACITY", 8)?;
        if odp_default_capacity < 1 {
            return Err(ConfigError::Invalid(
                "OLT_ODP_DEFAULT_CAPACITY".to_string(),
                odp_default_capacity.to_string(),
            ));
        }
        let delete_policy = match reader.optional("OLT_DELETE_POLICY") {
            Some(value) => value
                .parse::<DeletePolicy>()
                .map_err(|_| ConfigError::Invalid("OLT_DELETE_POLICY".to_string(), value))?,
            None => DeletePolicy::Restrict,
        };

        Ok(Self {
            http_addr,
            database_url,
            database_max_connections,
            seed_demo,
            bootstrap_admin,
            jwt_secret,
            jwt_access_ttl_seconds,
            jwt_refresh_ttl_seconds,
            odp_default_capacity,
            delete_policy,
        })
    }
}

struct Reader<F> {
    lookup: F,
}

impl<F> Reader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// 空字符串等同于未设置。
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn u64_with_default(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn u32_with_default(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        value
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn i32_with_default(&self, key: &str, default: i32) -> Result<i32, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        value
            .trim()
            .parse::<i32>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn bool_with_default(&self, key: &str, default: bool) -> bool {
        match self.optional(key) {
            Some(value) => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            ),
            None => default,
        }
    }
}
