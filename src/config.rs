//! Application configuration loaded from environment variables.

use crate::identity::UserAccount;
use anyhow::{Context, anyhow};
use serde::Deserialize;
use std::{num::NonZeroU32, str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8000").
    pub bind_addr: String,

    /// Secret used to sign session tokens.
    pub jwt_secret: String,

    /// Accounts the identity provider accepts.
    pub users: Vec<UserAccount>,

    /// Name shown above every cheep in the feed.
    pub author_name: String,

    /// Maximum number of cheeps on the home feed.
    pub feed_limit: usize,

    /// Bound on every call to the post store.
    pub upstream_timeout: Duration,

    /// Bound on handling a whole request.
    pub request_timeout: Duration,

    pub session_ttl: Duration,

    /// Sign-in attempts allowed per email address per minute.
    pub login_attempts_per_minute: NonZeroU32,

    pub max_concurrent_requests: usize,
}

/// Shape of the `CHEEPER_CONFIG` JSON blob.
#[derive(Debug, Deserialize)]
struct ConfigBlob {
    #[serde(default)]
    users: Vec<UserAccount>,
    author_name: Option<String>,
    feed_limit: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `CHEEPER_CONFIG`: JSON `{"users": [{"email", "password_hash", "display_name"?}], "author_name"?, "feed_limit"?}`
    /// - `JWT_SECRET`: session signing secret
    ///
    /// Optional:
    /// - `BIND_ADDR` (default: "0.0.0.0:8000")
    /// - `UPSTREAM_TIMEOUT_SECS` (default: 10)
    /// - `REQUEST_TIMEOUT_SECS` (default: 30)
    /// - `SESSION_TTL_HOURS` (default: 24)
    /// - `LOGIN_ATTEMPTS_PER_MINUTE` (default: 5)
    /// - `MAX_CONCURRENT_REQUESTS` (default: 1024)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `get`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let raw = get("CHEEPER_CONFIG").ok_or_else(|| anyhow!("CHEEPER_CONFIG must be set"))?;
        let blob: ConfigBlob =
            serde_json::from_str(&raw).context("CHEEPER_CONFIG is not valid JSON")?;

        let jwt_secret = get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET must be set"))?;

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string());

        let feed_limit = blob.feed_limit.unwrap_or(100);
        if feed_limit == 0 {
            return Err(anyhow!("feed_limit must be at least 1"));
        }

        let login_attempts: u32 = parse_or(&get, "LOGIN_ATTEMPTS_PER_MINUTE", 5)?;
        let login_attempts_per_minute = NonZeroU32::new(login_attempts)
            .ok_or_else(|| anyhow!("LOGIN_ATTEMPTS_PER_MINUTE must be at least 1"))?;

        let session_ttl_hours: u64 = parse_or(&get, "SESSION_TTL_HOURS", 24)?;
        let session_ttl_secs = session_ttl_hours
            .checked_mul(3600)
            .ok_or_else(|| anyhow!("SESSION_TTL_HOURS is too large: {session_ttl_hours}"))?;

        let config = Self {
            bind_addr,
            jwt_secret,
            users: blob.users,
            author_name: blob.author_name.unwrap_or_else(|| "TodePond".to_string()),
            feed_limit,
            upstream_timeout: Duration::from_secs(parse_or(&get, "UPSTREAM_TIMEOUT_SECS", 10)?),
            request_timeout: Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?),
            session_ttl: Duration::from_secs(session_ttl_secs),
            login_attempts_per_minute,
            max_concurrent_requests: parse_or(&get, "MAX_CONCURRENT_REQUESTS", 1024)?,
        };

        tracing::info!(
            bind_addr = %config.bind_addr,
            users = config.users.len(),
            feed_limit = config.feed_limit,
            upstream_timeout_secs = config.upstream_timeout.as_secs(),
            "configuration loaded"
        );

        Ok(config)
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        None => Ok(default),
    }
}
