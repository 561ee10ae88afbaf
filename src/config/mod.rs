use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    error::{AppError, Result},
    services::wish::validation::normalize_color,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub wish: WishConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct WishConfig {
    pub default_color: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub user_cache_ttl: Duration,
    pub user_cache_max_capacity: u64,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// JSON file backing the session keys. `None` keeps them in memory only.
    pub path: Option<PathBuf>,
}

const DEFAULT_WISH_COLOR: &str = "#6366f1";
const DEFAULT_USER_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_USER_CACHE_MAX_CAPACITY: u64 = 64;

impl Default for Config {
    fn default() -> Self {
        Self {
            wish: WishConfig {
                default_color: DEFAULT_WISH_COLOR.to_string(),
            },
            session: SessionConfig {
                user_cache_ttl: Duration::from_secs(DEFAULT_USER_CACHE_TTL_SECS),
                user_cache_max_capacity: DEFAULT_USER_CACHE_MAX_CAPACITY,
            },
            storage: StorageConfig { path: None },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            wish: WishConfig {
                default_color: env_or_default("WISH_DEFAULT_COLOR", DEFAULT_WISH_COLOR),
            },
            session: SessionConfig {
                user_cache_ttl: Duration::from_secs(env_or_parse(
                    "USER_CACHE_TTL_SECS",
                    DEFAULT_USER_CACHE_TTL_SECS,
                )?),
                user_cache_max_capacity: env_or_parse(
                    "USER_CACHE_MAX_CAPACITY",
                    DEFAULT_USER_CACHE_MAX_CAPACITY,
                )?,
            },
            storage: StorageConfig {
                path: env_optional("SESSION_STORAGE_PATH").map(PathBuf::from),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if normalize_color(&self.wish.default_color).is_none() {
            return Err(AppError::InvalidParams(
                "WISH_DEFAULT_COLOR must be a #rrggbb color".into(),
            ));
        }

        if self.session.user_cache_ttl.is_zero() {
            return Err(AppError::InvalidParams(
                "USER_CACHE_TTL_SECS must be positive".into(),
            ));
        }

        if self.session.user_cache_max_capacity == 0 {
            return Err(AppError::InvalidParams(
                "USER_CACHE_MAX_CAPACITY must be positive".into(),
            ));
        }

        Ok(())
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|_| AppError::InvalidParams(format!("Invalid value for {key}"))),
        Err(_) => Ok(default),
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
