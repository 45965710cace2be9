use chrono::{Duration, Utc};
use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    /// Browser origins allowed by CORS; `*` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;
    pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", lookup("PORT"), 8000u16)?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let ttl_days = parse_or(
            "TOKEN_TTL_DAYS",
            lookup("TOKEN_TTL_DAYS"),
            Self::DEFAULT_TOKEN_TTL_DAYS,
        )?;
        let token_ttl = Some(ttl_days)
            .filter(|d| (1..=Self::MAX_TOKEN_TTL_DAYS).contains(d))
            .and_then(Duration::try_days)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| ConfigError::Invalid {
                key: "TOKEN_TTL_DAYS",
                value: ttl_days.to_string(),
            })?;

        let bcrypt_cost = parse_or("BCRYPT_COST", lookup("BCRYPT_COST"), bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let cors_allowed_origins = parse_origins(lookup("CORS_ALLOWED_ORIGINS"))?;

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl,
            bcrypt_cost,
            cors_allowed_origins,
        })
    }
}

/// Comma-separated list, e.g. `https://app.example.com,https://admin.example.com`.
/// Unset or empty allows any origin.
fn parse_origins(raw: Option<String>) -> Result<Vec<String>, ConfigError> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(vec!["*".to_string()]);
    };

    raw.split(',')
        .map(str::trim)
        .map(|origin| {
            if origin == "*" || origin.starts_with("http://") || origin.starts_with("https://") {
                Ok(origin.trim_end_matches('/').to_string())
            } else {
                Err(ConfigError::Invalid {
                    key: "CORS_ALLOWED_ORIGINS",
                    value: origin.to_string(),
                })
            }
        })
        .collect()
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
