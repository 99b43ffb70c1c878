//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs, plus the server and
//! retention settings built on top of them.

use crate::common::error::{CommonError, CommonResult};
use crate::retention::schedule::{CleanupSchedule, DEFAULT_CLEANUP_SCHEDULE};
use crate::retention::DEFAULT_RETENTION_DAYS;

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;
/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/monitor.db";

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use monitor_persistence::config::get_env_with_fallback;
///
/// let url = get_env_with_fallback("MONITOR_DATABASE_URL", "DATABASE_URL");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Read a boolean flag; `1/true/yes/on` (case-insensitive) enable it.
pub fn get_env_flag(new_name: &str, old_name: &str) -> bool {
    get_env_with_fallback(new_name, old_name)
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Database URL from `MONITOR_DATABASE_URL` (legacy: `DATABASE_URL`).
pub fn database_url() -> String {
    get_env_with_fallback_or("MONITOR_DATABASE_URL", "DATABASE_URL", DEFAULT_DATABASE_URL)
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Insert sample observations when the store is empty
    pub seed_sample_data: bool,
}

impl ServerConfig {
    /// Load server configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: get_env_with_fallback_or("MONITOR_HOST", "HOST", DEFAULT_HOST),
            port: get_env_with_fallback_parse("MONITOR_PORT", "PORT", DEFAULT_PORT),
            seed_sample_data: get_env_flag("MONITOR_SEED_SAMPLE_DATA", "SEED_SAMPLE_DATA"),
        }
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Retention cleanup settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Age threshold in days; `<= 0` disables the scheduled task.
    pub retention_days: i64,
    /// When the scheduled cleanup fires.
    pub schedule: CleanupSchedule,
    /// Run one cleanup right after startup.
    pub run_on_startup: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_days: i64::from(DEFAULT_RETENTION_DAYS),
            schedule: CleanupSchedule::default(),
            run_on_startup: false,
        }
    }
}

impl RetentionConfig {
    /// Load retention configuration from environment variables.
    ///
    /// Unlike the generic helpers, malformed values are reported instead of
    /// silently replaced by defaults.
    pub fn from_env() -> CommonResult<Self> {
        let retention_days = match get_env_with_fallback(
            "MONITOR_RETENTION_DAYS",
            "MONITOR_DATA_RETENTION_DAYS",
        ) {
            Some(value) => value.trim().parse::<i64>().map_err(|_| {
                CommonError::Config(format!(
                    "MONITOR_RETENTION_DAYS must be an integer, got '{}'",
                    value
                ))
            })?,
            None => i64::from(DEFAULT_RETENTION_DAYS),
        };

        let schedule = CleanupSchedule::parse(&get_env_with_fallback_or(
            "MONITOR_CLEANUP_SCHEDULE",
            "MONITOR_DATA_CLEANUP_CRON",
            DEFAULT_CLEANUP_SCHEDULE,
        ))?;

        Ok(Self {
            retention_days,
            schedule,
            run_on_startup: get_env_flag("MONITOR_CLEANUP_ON_STARTUP", "CLEANUP_ON_STARTUP"),
        })
    }

    /// Retention in whole days, or `None` when cleanup is disabled.
    pub fn effective_days(&self) -> Option<u32> {
        if self.retention_days <= 0 {
            return None;
        }
        Some(u32::try_from(self.retention_days).unwrap_or(u32::MAX))
    }
}
