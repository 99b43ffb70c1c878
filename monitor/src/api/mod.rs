//! REST APIハンドラー
//!
//! ルーター構築と各エンドポイントの登録

/// APIエラーレスポンス
pub mod error;
/// 監視レコードAPI
pub mod records;

use crate::AppState;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// アプリケーションのルーターを構築
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(records::health))
        .route(
            "/api/records",
            post(records::create_record).get(records::list_records),
        )
        .route("/api/records/unique", get(records::get_unique_records))
        .route("/api/records/cleanup", post(records::run_cleanup))
        .route("/api/records/last/:seconds", get(records::get_recent_records))
        .route("/api/records/name/:name", get(records::get_records_by_name))
        .route(
            "/api/records/name/:name/since/:timestamp",
            get(records::get_records_by_name_since),
        )
        .route(
            "/api/records/:id",
            get(records::get_record).delete(records::delete_record),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
