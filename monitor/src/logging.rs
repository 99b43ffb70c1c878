//! Logging initialization
//!
//! Human-readable logs go to stdout. When `MONITOR_LOG_DIR` is set, a JSON copy
//! is also written to a daily-rotated file in that directory.

use tracing_appender::rolling;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Default filter when neither `MONITOR_LOG_LEVEL` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,sqlx::query=warn";

/// File name prefix for rotated log files.
const LOG_FILE_PREFIX: &str = "monitor.log";

/// Install the global tracing subscriber.
pub fn init() -> Result<(), TryInitError> {
    let env_filter = EnvFilter::new(log_filter());

    let file_layer = std::env::var("MONITOR_LOG_DIR").ok().map(|dir| {
        fmt::layer()
            .with_writer(rolling::daily(dir, LOG_FILE_PREFIX))
            .with_ansi(false)
            .json()
    });

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
}

/// Filter directive from `MONITOR_LOG_LEVEL`, then `RUST_LOG`.
///
/// Runs before the subscriber exists, so it must not log.
fn log_filter() -> String {
    ["MONITOR_LOG_LEVEL", "RUST_LOG"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}
