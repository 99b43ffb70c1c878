//! Repository traitパターン定義
//!
//! DB操作を抽象化し、テスタビリティを向上させるためのtrait。
//! クエリエンジンとリテンション管理はこのtrait越しにストアへアクセスする。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::error::MonitorError;
use crate::types::observation::{NewObservation, Observation};

// ---------------------------------------------------------------------------
// ObservationRepository
// ---------------------------------------------------------------------------

/// 監視レコード操作のRepository trait
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    /// レコードを保存（IDとタイムスタンプはストアが割り当てる）
    async fn save(&self, new: NewObservation) -> Result<Observation, MonitorError>;
    /// IDでレコードを取得
    async fn find_by_id(&self, id: i64) -> Result<Option<Observation>, MonitorError>;
    /// IDでレコードを削除
    async fn delete_by_id(&self, id: i64) -> Result<bool, MonitorError>;
    /// すべてのレコードを取得
    async fn list_all(&self) -> Result<Vec<Observation>, MonitorError>;
    /// レコード件数
    async fn count(&self) -> Result<u64, MonitorError>;
    /// 名前が完全一致するレコードを取得
    async fn find_by_name(&self, name: &str) -> Result<Vec<Observation>, MonitorError>;
    /// 指定時刻以降のレコードを取得
    async fn find_since(&self, from: DateTime<Utc>) -> Result<Vec<Observation>, MonitorError>;
    /// 指定名・指定時刻以降のレコードを取得
    async fn find_by_name_since(
        &self,
        name: &str,
        from: DateTime<Utc>,
    ) -> Result<Vec<Observation>, MonitorError>;
    /// `(name, url)`ごとの最新レコードを取得
    async fn find_latest_per_key(&self) -> Result<Vec<Observation>, MonitorError>;
    /// 指定時刻より古いレコードを削除
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, MonitorError>;
}

#[async_trait]
impl ObservationRepository for super::records::RecordStore {
    async fn save(&self, new: NewObservation) -> Result<Observation, MonitorError> {
        self.save(new).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Observation>, MonitorError> {
        self.find_by_id(id).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, MonitorError> {
        self.delete_by_id(id).await
    }

    async fn list_all(&self) -> Result<Vec<Observation>, MonitorError> {
        self.list_all().await
    }

    async fn count(&self) -> Result<u64, MonitorError> {
        self.count().await
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Observation>, MonitorError> {
        self.find_by_name(name).await
    }

    async fn find_since(&self, from: DateTime<Utc>) -> Result<Vec<Observation>, MonitorError> {
        self.find_since(from).await
    }

    async fn find_by_name_since(
        &self,
        name: &str,
        from: DateTime<Utc>,
    ) -> Result<Vec<Observation>, MonitorError> {
        self.find_by_name_since(name, from).await
    }

    async fn find_latest_per_key(&self) -> Result<Vec<Observation>, MonitorError> {
        self.find_latest_per_key().await
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, MonitorError> {
        self.delete_older_than(cutoff).await
    }
}
