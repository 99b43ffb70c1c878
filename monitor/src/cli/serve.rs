//! serve サブコマンド
//!
//! HTTPサーバーとリテンションタスクを起動します。

use crate::config::ServerConfig;
use clap::Args;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value = "8080", env = "MONITOR_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "MONITOR_HOST")]
    pub host: String,

    /// Insert sample records when the database is empty
    #[arg(
        long,
        default_value_t = false,
        env = "MONITOR_SEED_SAMPLE_DATA",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub seed_sample_data: bool,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            seed_sample_data: args.seed_sample_data,
        }
    }
}
