//! 定期クリーンアップのバックグラウンドタスク
//!
//! プロセス起動時に1つだけ生成し、`ShutdownController`の停止要求で終了する。

use super::RetentionManager;
use crate::clock::Clock;
use crate::config::RetentionConfig;
use crate::shutdown::ShutdownController;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 定期クリーンアップタスクを開始
///
/// 保持期間が0以下の場合はタスクを起動せず`None`を返す。
/// クリーンアップの失敗はログに記録するだけで、タスクは次のトリガーまで待機を続ける。
pub fn start_cleanup_task(
    manager: Arc<RetentionManager>,
    config: RetentionConfig,
    shutdown: ShutdownController,
) -> Option<JoinHandle<()>> {
    let Some(retention_days) = config.effective_days() else {
        tracing::info!(
            "Data cleanup disabled (retention days {} <= 0)",
            config.retention_days
        );
        return None;
    };

    tracing::info!(
        retention_days,
        schedule = %config.schedule,
        "Data cleanup task started"
    );

    Some(tokio::spawn(async move {
        if config.run_on_startup {
            if let Err(e) = manager.cleanup(retention_days).await {
                tracing::error!("Initial data cleanup failed: {}", e);
            }
        }

        let clock = manager.clock();
        loop {
            let now = clock.now();
            let next_run = config.schedule.next_after(now);
            let wait = (next_run - now).to_std().unwrap_or_default();
            tracing::debug!(next_run = %next_run, "Next data cleanup scheduled");

            tokio::select! {
                _ = shutdown.wait() => break,
                _ = tokio::time::sleep(wait) => {}
            }

            if let Err(e) = manager.cleanup(retention_days).await {
                tracing::error!("Scheduled data cleanup failed: {}", e);
            }
        }

        tracing::info!("Data cleanup task stopped");
    }))
}
