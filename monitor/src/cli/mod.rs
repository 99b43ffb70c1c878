//! CLI module for monitor-persistence
//!
//! Provides command-line interface for the server and maintenance tasks.

pub mod cleanup;
pub mod serve;

use clap::{Parser, Subcommand};

/// Monitor persistence - stores health-check results and prunes old ones
#[derive(Parser, Debug)]
#[command(name = "monitor-persistence")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    MONITOR_HOST                Bind address (default: 0.0.0.0)
    MONITOR_PORT                Listen port (default: 8080)
    MONITOR_DATABASE_URL        Database URL (default: sqlite:./data/monitor.db)
    MONITOR_LOG_LEVEL           Log level (default: info)
    MONITOR_LOG_DIR             Directory for daily JSON log files
    MONITOR_RETENTION_DAYS      Days to keep records, <= 0 disables cleanup (default: 7)
    MONITOR_CLEANUP_SCHEDULE    HH:MM, @daily, @hourly or @every <N><s|m|h|d> (default: 00:00)
    MONITOR_CLEANUP_ON_STARTUP  Run one cleanup at startup
    MONITOR_SEED_SAMPLE_DATA    Insert sample records into an empty database
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server and the retention task
    Serve(serve::ServeArgs),
    /// Run one retention cleanup and exit
    Cleanup(cleanup::CleanupArgs),
}
