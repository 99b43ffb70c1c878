//! Monitor persistence server
//!
//! ヘルスチェック結果（監視レコード）を永続化し、クエリと保持期間管理を提供する。

#![warn(missing_docs)]

/// 共通型定義（エラー型）
pub mod common;

/// REST APIハンドラー
pub mod api;

/// 起動時のサンプルデータ投入
pub mod bootstrap;

/// CLIインターフェース
pub mod cli;

/// 時刻の取得元（テストでは固定可能）
pub mod clock;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 読み取りクエリ
pub mod query;

/// データ保持期間管理
pub mod retention;

/// axumサーバー起動
pub mod server;

/// Shutdown controller
pub mod shutdown;

/// 型定義
pub mod types;

use std::sync::Arc;

/// アプリケーション状態
///
/// ストアは1つだけ生成し、クエリエンジンとリテンションマネージャーへ同じハンドルを渡す。
#[derive(Clone)]
pub struct AppState {
    /// 監視レコードストア（唯一の書き込み経路）
    pub store: Arc<db::records::RecordStore>,
    /// クエリエンジン
    pub queries: query::QueryEngine,
    /// リテンションマネージャー
    pub retention: Arc<retention::RetentionManager>,
    /// 保持期間設定
    pub retention_config: config::RetentionConfig,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
}

impl AppState {
    /// ストアから各コンポーネントを組み立てる
    pub fn new(
        store: db::records::RecordStore,
        retention_config: config::RetentionConfig,
        shutdown: shutdown::ShutdownController,
    ) -> Self {
        let clock = store.clock();
        let store = Arc::new(store);
        let repo: Arc<dyn db::traits::ObservationRepository> = store.clone();

        Self {
            queries: query::QueryEngine::new(repo.clone(), clock.clone()),
            retention: Arc::new(retention::RetentionManager::new(repo, clock)),
            store,
            retention_config,
            shutdown,
        }
    }
}
