//! Startup configuration read from the environment.
//!
//! Both Supabase values must be present for remote persistence; without them
//! the dashboard still runs on local data and reports itself as not configured.

use std::time::Duration;

pub const URL_VAR: &str = "CALLBOARD_SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "CALLBOARD_SUPABASE_ANON_KEY";
pub const TABLE_VAR: &str = "CALLBOARD_TABLE";
pub const TIMEOUT_VAR: &str = "CALLBOARD_REMOTE_TIMEOUT_MS";

pub const DEFAULT_TABLE: &str = "call_analytics";
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub remote: Option<RemoteConfig>,
    pub remote_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: None,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let remote = match (non_empty(URL_VAR), non_empty(ANON_KEY_VAR)) {
            (Some(url), Some(anon_key)) => Some(RemoteConfig {
                url,
                anon_key,
                table: non_empty(TABLE_VAR).unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            }),
            _ => None,
        };

        let remote_timeout = non_empty(TIMEOUT_VAR)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REMOTE_TIMEOUT);

        Self {
            remote,
            remote_timeout,
        }
    }
}
