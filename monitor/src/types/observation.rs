//! 監視レコード型定義
//!
//! ヘルスチェック1回分の結果（名前・URL・ステータス・レイテンシ・エラー）

use crate::common::error::{CommonError, CommonResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 永続化済みの監視レコード
///
/// `id`と`timestamp`はストアが割り当て、作成後は変更されない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// ストアが割り当てた一意なID
    pub id: i64,
    /// 監視対象の論理名（一意ではない）
    pub name: String,
    /// チェック対象URL
    pub url: String,
    /// HTTPステータスコード
    pub status_code: i32,
    /// チェック実施時刻（保存時にストアが設定）
    pub timestamp: DateTime<Utc>,
    /// レスポンスタイム（ミリ秒）
    pub response_time_ms: u64,
    /// 失敗時のエラーメッセージ
    #[serde(default)]
    pub error_message: Option<String>,
}

/// 保存前の監視レコード
///
/// IDとタイムスタンプを持たない。どちらも`RecordStore::save`で割り当てられる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewObservation {
    /// 監視対象の論理名
    pub name: String,
    /// チェック対象URL
    pub url: String,
    /// HTTPステータスコード
    pub status_code: i32,
    /// レスポンスタイム（ミリ秒）
    pub response_time_ms: u64,
    /// 失敗時のエラーメッセージ
    pub error_message: Option<String>,
}

impl NewObservation {
    /// 新しい保存前レコードを作成
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        status_code: i32,
        response_time_ms: u64,
        error_message: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            status_code,
            response_time_ms,
            error_message,
        }
    }

    /// 入力値を検証する
    ///
    /// 空の名前・URLは受け付けない。
    pub fn validate(&self) -> CommonResult<()> {
        if self.name.trim().is_empty() {
            return Err(CommonError::Validation("name must not be empty".to_string()));
        }
        if self.url.trim().is_empty() {
            return Err(CommonError::Validation("url must not be empty".to_string()));
        }
        // SQLiteのINTEGERは符号付き64bit
        if self.response_time_ms > i64::MAX as u64 {
            return Err(CommonError::Validation(
                "responseTimeMs is out of range".to_string(),
            ));
        }
        Ok(())
    }

    /// 保存済みレコードを組み立てる（ストア内部用）
    pub(crate) fn into_observation(self, id: i64, timestamp: DateTime<Utc>) -> Observation {
        Observation {
            id,
            name: self.name,
            url: self.url,
            status_code: self.status_code,
            timestamp,
            response_time_ms: self.response_time_ms,
            error_message: self.error_message,
        }
    }
}
