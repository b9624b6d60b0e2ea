//! Application configuration

use chrono::Duration;
use std::str::FromStr;

/// Runtime settings, read from the environment with development defaults
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Postgres connection string; `None` runs on the in-memory store
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// Attach raw error text to internal-error responses
    pub debug: bool,
    /// Allowed CORS origins; empty allows any
    pub cors_origins: Vec<String>,
    pub require_verified_email: bool,
    pub db_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "development-secret-change-in-production".to_string()),
            access_token_ttl: env_ttl("ACCESS_TOKEN_EXPIRE_MINUTES", 30, Duration::try_minutes),
            refresh_token_ttl: env_ttl("REFRESH_TOKEN_EXPIRE_DAYS", 7, Duration::try_days),
            debug: env_flag("DEBUG"),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            require_verified_email: env_flag("REQUIRE_VERIFIED_EMAIL"),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 10),
        }
    }
}

impl AppConfig {
    /// In-memory configuration with a fixed secret
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            jwt_secret: "test-secret".to_string(),
            access_token_ttl: Duration::minutes(30),
            refresh_token_ttl: Duration::days(7),
            debug: false,
            cors_origins: Vec::new(),
            require_verified_email: false,
            db_max_connections: 1,
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

/// Token lifetime from `key` in the units of `to_duration`. Values that are
/// not positive or overflow fall back to `default`.
fn env_ttl(key: &str, default: i64, to_duration: fn(i64) -> Option<Duration>) -> Duration {
    let value = env_parse(key, default);
    positive_ttl(value, to_duration)
        .or_else(|| {
            tracing::warn!(key, value, "ignoring out-of-range setting");
            positive_ttl(default, to_duration)
        })
        .unwrap_or_else(Duration::zero)
}

fn positive_ttl(value: i64, to_duration: fn(i64) -> Option<Duration>) -> Option<Duration> {
    to_duration(value).filter(|ttl| *ttl > Duration::zero())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key).map(|v| parse_flag(&v)).unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
