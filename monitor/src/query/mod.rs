//! 監視レコードのクエリエンジン
//!
//! 読み取り専用の操作（ID指定・名前指定・時間窓・`(name, url)`ごとの最新）をまとめる。
//! 現在時刻は[`Clock`]から取得するため、時間窓の挙動はテストで固定できる。

use crate::clock::Clock;
use crate::common::error::{MonitorError, MonitorResult};
use crate::db::traits::ObservationRepository;
use crate::types::observation::Observation;
use chrono::{DateTime, Datelike, Duration, NaiveDateTime, SubsecRound, Utc};
use std::sync::Arc;

/// タイムゾーン無しで受け付けるISO-8601形式（UTCとして解釈）
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// 保存形式（4桁年）で表現できる年の範囲
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// 読み取り専用のクエリエンジン
#[derive(Clone)]
pub struct QueryEngine {
    repo: Arc<dyn ObservationRepository>,
    clock: Arc<dyn Clock>,
}

impl QueryEngine {
    /// 新しいクエリエンジンを作成
    pub fn new(repo: Arc<dyn ObservationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// IDでレコードを取得（見つからない場合は`None`）
    pub async fn get_by_id(&self, id: i64) -> MonitorResult<Option<Observation>> {
        self.repo.find_by_id(id).await
    }

    /// すべてのレコード
    pub async fn list_all(&self) -> MonitorResult<Vec<Observation>> {
        self.repo.list_all().await
    }

    /// 名前が完全一致するレコード（新しい順）
    pub async fn by_name(&self, name: &str) -> MonitorResult<Vec<Observation>> {
        self.repo.find_by_name(name).await
    }

    /// 直近`duration_seconds`秒以内のレコード（新しい順）
    ///
    /// `timestamp >= now - duration_seconds`。範囲外の巨大な値は全件扱いになる。
    pub async fn since_duration(&self, duration_seconds: u64) -> MonitorResult<Vec<Observation>> {
        let from = window_start(self.clock.now(), duration_seconds);
        self.repo.find_since(from).await
    }

    /// 指定名で、指定時刻以降のレコード（新しい順）
    ///
    /// 時刻文字列はストアに問い合わせる前に検証する。
    /// 解析できない場合は`InvalidTimestampFormat`を返し、読み取りは行わない。
    pub async fn since_timestamp(
        &self,
        name: &str,
        timestamp: &str,
    ) -> MonitorResult<Vec<Observation>> {
        let from = parse_iso_timestamp(timestamp)?;
        self.repo.find_by_name_since(name, from).await
    }

    /// `(name, url)`ごとに最新の1件
    pub async fn latest_per_key(&self) -> MonitorResult<Vec<Observation>> {
        self.repo.find_latest_per_key().await
    }
}

fn window_start(now: DateTime<Utc>, duration_seconds: u64) -> DateTime<Utc> {
    // 保存時と同じマイクロ秒精度に揃える
    let now = now.trunc_subsecs(6);
    i64::try_from(duration_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// ISO-8601の日時文字列を解析する
///
/// オフセット付き（`2023-06-15T10:15:30Z`, `2023-06-15T10:15:30+09:00`）はUTCへ変換し、
/// オフセット無し（`2023-06-15T10:15:30`）はUTCとして扱う。
/// 年が0000〜9999の範囲外（`+10000-01-01T00:00:00`など）は不正な形式として扱う。
pub fn parse_iso_timestamp(value: &str) -> MonitorResult<DateTime<Utc>> {
    let value = value.trim();

    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NAIVE_TIMESTAMP_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|naive| naive.and_utc())
        })
        .filter(|parsed| STORABLE_YEARS.contains(&parsed.year()))
        .ok_or_else(|| MonitorError::InvalidTimestampFormat(value.to_string()))
}
