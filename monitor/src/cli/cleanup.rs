//! cleanup サブコマンド
//!
//! 保持期間より古いレコードを1回だけ削除して終了します。

use crate::clock::SystemClock;
use crate::config::{database_url, RetentionConfig};
use crate::db::migrations::initialize_database;
use crate::db::records::RecordStore;
use crate::retention::RetentionManager;
use anyhow::{bail, Context};
use clap::Args;
use std::sync::Arc;

/// cleanup サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct CleanupArgs {
    /// Days to keep (defaults to MONITOR_RETENTION_DAYS)
    #[arg(long)]
    pub retention_days: Option<u32>,
}

/// cleanup サブコマンドを実行
pub async fn execute(args: &CleanupArgs) -> Result<(), anyhow::Error> {
    execute_with_url(args, &database_url()).await.map(|deleted| {
        println!("Deleted {} record(s)", deleted);
    })
}

async fn execute_with_url(args: &CleanupArgs, database_url: &str) -> anyhow::Result<u64> {
    let retention_days = match args.retention_days {
        Some(days) => days,
        None => match RetentionConfig::from_env()?.effective_days() {
            Some(days) => days,
            None => bail!("retention is disabled; pass --retention-days to clean up anyway"),
        },
    };

    let pool = initialize_database(database_url)
        .await
        .with_context(|| format!("failed to open database {}", database_url))?;
    let store = Arc::new(RecordStore::new(pool.clone()));
    let manager = RetentionManager::new(store, Arc::new(SystemClock));

    let deleted = manager
        .cleanup(retention_days)
        .await
        .context("cleanup failed")?;

    pool.close().await;
    Ok(deleted)
}
