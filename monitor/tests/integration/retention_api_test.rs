//! `/api/records/cleanup` の統合テスト

use axum::http::{Method, StatusCode};
use chrono::Duration;
use monitor_persistence::config::RetentionConfig;

use crate::support::{create_test_app, create_test_app_with_config, record_body, send};

#[tokio::test]
async fn test_cleanup_uses_configured_retention() {
    let app = create_test_app().await;

    send(&app.router, Method::POST, "/api/records", Some(record_body("A", "X", 200, 1))).await;
    app.clock.advance(Duration::days(10));
    send(&app.router, Method::POST, "/api/records", Some(record_body("A", "X", 200, 2))).await;

    let (status, report) = send(&app.router, Method::POST, "/api/records/cleanup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["deletedCount"], 1);
    assert_eq!(report["retentionDays"], 7);
    assert!(report["cutoff"].is_string());

    let (_, report) = send(&app.router, Method::POST, "/api/records/cleanup", None).await;
    assert_eq!(report["deletedCount"], 0);

    let (_, all) = send(&app.router, Method::GET, "/api/records", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cleanup_with_explicit_retention_days() {
    let app = create_test_app().await;

    send(&app.router, Method::POST, "/api/records", Some(record_body("A", "X", 200, 1))).await;
    app.clock.advance(Duration::days(3));

    let (status, report) = send(
        &app.router,
        Method::POST,
        "/api/records/cleanup?retentionDays=2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["deletedCount"], 1);
    assert_eq!(report["retentionDays"], 2);
}

#[tokio::test]
async fn test_cleanup_requires_days_when_retention_disabled() {
    let app = create_test_app_with_config(RetentionConfig {
        retention_days: 0,
        ..RetentionConfig::default()
    })
    .await;

    let (status, _) = send(&app.router, Method::POST, "/api/records/cleanup", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/records/cleanup?retentionDays=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cleanup_rejects_negative_days() {
    let app = create_test_app().await;
    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/records/cleanup?retentionDays=-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
}
