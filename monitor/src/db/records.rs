//! 監視レコードのストレージ層
//!
//! SQLiteベースで監視レコード（Observation）を永続化する。
//! 永続状態を変更するのはこのモジュールだけ（保存・ID指定削除・期限切れ一括削除）。

use crate::clock::{Clock, SystemClock};
use crate::common::error::{MonitorError, MonitorResult};
use crate::types::observation::{NewObservation, Observation};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

/// 保存時のタイムスタンプ精度（マイクロ秒）
const TIMESTAMP_SUBSEC_DIGITS: u16 = 6;

/// 監視レコードストレージ（SQLite版）
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl RecordStore {
    /// 新しいストレージインスタンスを作成（システム時計を使用）
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// 時計を指定してストレージインスタンスを作成
    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// ストアが使用している時計
    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// レコードを保存
    ///
    /// タイムスタンプはストアの時計から割り当てる。INSERT 1文で完結するため、
    /// 途中状態の行が他の読み取りから見えることはない。
    pub async fn save(&self, new: NewObservation) -> MonitorResult<Observation> {
        new.validate()?;

        let timestamp = self.clock.now().trunc_subsecs(TIMESTAMP_SUBSEC_DIGITS);
        let response_time_ms = new.response_time_ms as i64;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO monitor_records (
                name, url, status_code, timestamp, response_time_ms, error_message
            ) VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(&new.url)
        .bind(new.status_code)
        .bind(format_timestamp(timestamp))
        .bind(response_time_ms)
        .bind(&new.error_message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| MonitorError::Database(format!("Failed to save record: {}", e)))?;

        tracing::debug!(id, name = %new.name, url = %new.url, "Monitor record saved");

        Ok(new.into_observation(id, timestamp))
    }

    /// IDでレコードを取得（存在しない場合は`None`）
    pub async fn find_by_id(&self, id: i64) -> MonitorResult<Option<Observation>> {
        let row = sqlx::query_as::<_, MonitorRecordRow>(
            "SELECT * FROM monitor_records WHERE id = ? LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MonitorError::Database(format!("Failed to load record: {}", e)))?;

        row.map(Observation::try_from).transpose()
    }

    /// IDでレコードを削除
    ///
    /// 存在しないIDの削除はエラーにしない。戻り値は実際に削除したかどうか。
    pub async fn delete_by_id(&self, id: i64) -> MonitorResult<bool> {
        let result = sqlx::query("DELETE FROM monitor_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| MonitorError::Database(format!("Failed to delete record: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    /// すべてのレコードを読み込み（ID昇順）
    pub async fn list_all(&self) -> MonitorResult<Vec<Observation>> {
        let rows = sqlx::query_as::<_, MonitorRecordRow>("SELECT * FROM monitor_records ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MonitorError::Database(format!("Failed to load records: {}", e)))?;

        rows_into_observations(rows)
    }

    /// レコード件数
    pub async fn count(&self) -> MonitorResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM monitor_records")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MonitorError::Database(format!("Failed to count records: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    /// 名前が完全一致するレコードを取得（タイムスタンプ降順）
    pub async fn find_by_name(&self, name: &str) -> MonitorResult<Vec<Observation>> {
        let rows = sqlx::query_as::<_, MonitorRecordRow>(
            "SELECT * FROM monitor_records WHERE name = ? ORDER BY timestamp DESC, id DESC",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MonitorError::Database(format!("Failed to query records: {}", e)))?;

        rows_into_observations(rows)
    }

    /// 指定時刻以降のレコードを取得（タイムスタンプ降順）
    pub async fn find_since(&self, from: DateTime<Utc>) -> MonitorResult<Vec<Observation>> {
        let rows = sqlx::query_as::<_, MonitorRecordRow>(
            "SELECT * FROM monitor_records WHERE timestamp >= ? ORDER BY timestamp DESC, id DESC",
        )
        .bind(format_timestamp(from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MonitorError::Database(format!("Failed to query records: {}", e)))?;

        rows_into_observations(rows)
    }

    /// 指定名・指定時刻以降のレコードを取得（タイムスタンプ降順）
    pub async fn find_by_name_since(
        &self,
        name: &str,
        from: DateTime<Utc>,
    ) -> MonitorResult<Vec<Observation>> {
        let rows = sqlx::query_as::<_, MonitorRecordRow>(
            r#"
            SELECT * FROM monitor_records
            WHERE name = ? AND timestamp >= ?
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(name)
        .bind(format_timestamp(from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MonitorError::Database(format!("Failed to query records: {}", e)))?;

        rows_into_observations(rows)
    }

    /// `(name, url)`ごとに最新の1件を取得
    ///
    /// `(name, url)`でグループ化して最大タイムスタンプを求め、元の行へ結合し直す。
    /// 同じ`(name, url, timestamp)`の行が複数ある場合は、IDが最大の行を採用する
    /// （必ず1件だけ返る）。1文のSELECTで実行するため、走査中は一貫したビューを見る。
    pub async fn find_latest_per_key(&self) -> MonitorResult<Vec<Observation>> {
        let rows = sqlx::query_as::<_, MonitorRecordRow>(
            r#"
            SELECT mr.* FROM monitor_records mr
            INNER JOIN (
                SELECT MAX(r.id) AS id
                FROM monitor_records r
                INNER JOIN (
                    SELECT name, url, MAX(timestamp) AS max_timestamp
                    FROM monitor_records
                    GROUP BY name, url
                ) latest
                    ON r.name = latest.name
                   AND r.url = latest.url
                   AND r.timestamp = latest.max_timestamp
                GROUP BY r.name, r.url
            ) winner ON mr.id = winner.id
            ORDER BY mr.name, mr.url
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MonitorError::Database(format!("Failed to query latest records: {}", e)))?;

        rows_into_observations(rows)
    }

    /// 指定時刻より古いレコードを一括削除
    ///
    /// `timestamp < cutoff`（厳密な小なり）の行だけを削除し、削除件数を返す。
    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> MonitorResult<u64> {
        let result = sqlx::query("DELETE FROM monitor_records WHERE timestamp < ?")
            .bind(format_timestamp(cutoff))
            .execute(&self.pool)
            .await
            .map_err(|e| MonitorError::Database(format!("Failed to cleanup records: {}", e)))?;

        Ok(result.rows_affected())
    }
}

/// 保存・比較用のタイムスタンプ文字列
///
/// 固定幅（マイクロ秒・`Z`付き）にすることで、文字列比較が時系列比較と一致する。
pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn rows_into_observations(rows: Vec<MonitorRecordRow>) -> MonitorResult<Vec<Observation>> {
    rows.into_iter().map(Observation::try_from).collect()
}

/// SQLiteから取得した行データ
#[derive(sqlx::FromRow)]
struct MonitorRecordRow {
    id: i64,
    name: String,
    url: String,
    status_code: i64,
    timestamp: String,
    response_time_ms: i64,
    error_message: Option<String>,
}

impl TryFrom<MonitorRecordRow> for Observation {
    type Error = MonitorError;

    fn try_from(row: MonitorRecordRow) -> Result<Self, Self::Error> {
        let timestamp = DateTime::parse_from_rfc3339(&row.timestamp)
            .map_err(|e| MonitorError::Database(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        let status_code = i32::try_from(row.status_code)
            .map_err(|e| MonitorError::Database(format!("Invalid status code: {}", e)))?;

        let response_time_ms = u64::try_from(row.response_time_ms)
            .map_err(|e| MonitorError::Database(format!("Invalid response time: {}", e)))?;

        Ok(Observation {
            id: row.id,
            name: row.name,
            url: row.url,
            status_code,
            timestamp,
            response_time_ms,
            error_message: row.error_message,
        })
    }
}
