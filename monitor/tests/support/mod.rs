//! 統合テスト用ユーティリティ

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use monitor_persistence::clock::MockClock;
use monitor_persistence::config::RetentionConfig;
use monitor_persistence::db::migrations::initialize_database;
use monitor_persistence::db::records::RecordStore;
use monitor_persistence::shutdown::ShutdownController;
use monitor_persistence::{api, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// テスト用のインメモリDBプールを作成する
pub async fn create_test_db_pool() -> SqlitePool {
    initialize_database("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// テスト用アプリ（時計は固定）
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<MockClock>,
}

/// `.oneshot()`スタイルのテスト用アプリを作成する
pub async fn create_test_app() -> TestApp {
    create_test_app_with_config(RetentionConfig::default()).await
}

/// 保持期間設定を指定してテスト用アプリを作成する
pub async fn create_test_app_with_config(retention_config: RetentionConfig) -> TestApp {
    let clock = Arc::new(MockClock::new());
    let store = RecordStore::with_clock(create_test_db_pool().await, clock.clone());
    let state = AppState::new(store, retention_config, ShutdownController::default());

    TestApp {
        router: api::create_app(state.clone()),
        state,
        clock,
    }
}

/// リクエストを送信し、ステータスとJSONボディを返す
///
/// ボディが空の場合は`Value::Null`、JSONでない場合は文字列を返す。
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    // axumの抽出エラーはプレーンテキストで返る
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

/// レコード作成リクエストのボディ
pub fn record_body(name: &str, url: &str, status_code: i32, response_time_ms: i64) -> Value {
    serde_json::json!({
        "name": name,
        "url": url,
        "statusCode": status_code,
        "responseTimeMs": response_time_ms,
    })
}
