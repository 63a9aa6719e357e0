//! Client configuration loaded from the environment.
//!
//! - `LABRISK_API_URL` (or `LABRISK_API`): scoring service base URL
//! - `LABRISK_HTTP_TIMEOUT_SECS`: per-request timeout

use std::time::Duration;

/// Base URL used when no override is set.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;

/// Settings for talking to the scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash.
    pub api_base: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_base(DEFAULT_API_BASE)
    }
}

impl ClientConfig {
    /// Config with default timeouts for the given base URL.
    #[must_use]
    pub fn with_base(api_base: &str) -> Self {
        Self {
            api_base: normalize_base(api_base),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = lookup("LABRISK_API_URL")
            .or_else(|| lookup("LABRISK_API"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let mut config = Self::with_base(&base);
        if let Some(secs) = lookup("LABRISK_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&v| v > 0)
        {
            config.request_timeout = Duration::from_secs(secs);
        }
        config
    }
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
