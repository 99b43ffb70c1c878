//! データ保持期間管理
//!
//! 保持期間（日数）より古い監視レコードを一括削除する。
//! 実行状態は Idle → Running → Idle の2状態のみで、実行中に届いたトリガーはスキップする。

/// スケジュール式
pub mod schedule;
/// バックグラウンドタスク
pub mod task;

use crate::clock::Clock;
use crate::common::error::MonitorResult;
use crate::db::traits::ObservationRepository;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use schedule::CleanupSchedule;
pub use task::start_cleanup_task;

/// デフォルトの保持期間（日）
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// 1回のクリーンアップ結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    /// 削除件数
    pub deleted_count: u64,
    /// 使用した保持期間（日）
    pub retention_days: u32,
    /// この時刻より古いレコードを削除した
    pub cutoff: DateTime<Utc>,
}

/// クリーンアップの実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// 実行して完了した
    Completed(CleanupReport),
    /// 別の実行が進行中だったためスキップした
    Skipped,
}

/// 保持期間管理
pub struct RetentionManager {
    repo: Arc<dyn ObservationRepository>,
    clock: Arc<dyn Clock>,
    running: AtomicBool,
}

impl RetentionManager {
    /// 新しいリテンションマネージャーを作成
    pub fn new(repo: Arc<dyn ObservationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            running: AtomicBool::new(false),
        }
    }

    /// 基準時刻の取得元
    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// 実行中かどうか
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 保持期間より古いレコードを削除し、削除件数を返す
    ///
    /// 実行中に呼ばれた場合は何も削除せず0を返す（進行中の実行が同じ削除を行う）。
    pub async fn cleanup(&self, retention_days: u32) -> MonitorResult<u64> {
        match self.run(retention_days).await? {
            CleanupOutcome::Completed(report) => Ok(report.deleted_count),
            CleanupOutcome::Skipped => Ok(0),
        }
    }

    /// クリーンアップを1回実行する
    ///
    /// `cutoff = now - retention_days`。`timestamp < cutoff`の行だけを1文で削除する。
    /// 失敗はログに記録して呼び出し元へ返す。
    pub async fn run(&self, retention_days: u32) -> MonitorResult<CleanupOutcome> {
        let Some(_guard) = RunningGuard::acquire(&self.running) else {
            tracing::warn!(retention_days, "Data cleanup already running, skipping trigger");
            return Ok(CleanupOutcome::Skipped);
        };

        // 保存時と同じマイクロ秒精度に揃える
        let cutoff = self
            .clock
            .now()
            .trunc_subsecs(6)
            .checked_sub_signed(Duration::days(i64::from(retention_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        tracing::info!(
            retention_days,
            cutoff = %cutoff,
            "Starting data cleanup"
        );

        match self.repo.delete_older_than(cutoff).await {
            Ok(deleted_count) => {
                tracing::info!(
                    deleted = deleted_count,
                    retention_days,
                    "Data cleanup completed"
                );
                Ok(CleanupOutcome::Completed(CleanupReport {
                    deleted_count,
                    retention_days,
                    cutoff,
                }))
            }
            Err(e) => {
                tracing::error!(error = %e, retention_days, "Data cleanup failed");
                Err(e)
            }
        }
    }
}

/// Running状態を保持するガード（drop時にIdleへ戻す）
struct RunningGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
