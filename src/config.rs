//! Settings read from the environment (after `.env` is loaded).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bot_token: String,
    pub api_address: String,
    pub options_cache_ttl: Duration,
    pub user_state_ttl: Duration,
    pub cors_allow_origins: Option<String>,
}

impl Config {
    pub const DEFAULT_API_ADDRESS: &'static str = "0.0.0.0:8000";
    pub const DEFAULT_OPTIONS_CACHE_TTL_SECS: u64 = 3600;
    pub const DEFAULT_USER_STATE_TTL_HOURS: u64 = 168;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let cache_ttl_secs = parse_or(&lookup, "OPTIONS_CACHE_TTL_SECS", Self::DEFAULT_OPTIONS_CACHE_TTL_SECS)?;
        let user_ttl_hours: u64 = parse_or(&lookup, "USER_STATE_TTL_HOURS", Self::DEFAULT_USER_STATE_TTL_HOURS)?;
        let user_ttl_secs = user_ttl_hours.checked_mul(3600).ok_or_else(|| ConfigError::Invalid {
            name: "USER_STATE_TTL_HOURS",
            value: user_ttl_hours.to_string(),
        })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bot_token: required("TELOXIDE_TOKEN")?,
            api_address: lookup("API_ADDRESS").unwrap_or_else(|| Self::DEFAULT_API_ADDRESS.to_string()),
            options_cache_ttl: Duration::from_secs(cache_ttl_secs),
            user_state_ttl: Duration::from_secs(user_ttl_secs),
            cors_allow_origins: lookup("CORS_ALLOW_ORIGINS"),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
