//! `/api/records` の統合テスト

use axum::http::{Method, StatusCode};
use chrono::Duration;
use monitor_persistence::clock::Clock;
use serde_json::json;

use crate::support::{create_test_app, record_body, send};

#[tokio::test]
async fn test_create_and_get_record() {
    let app = create_test_app().await;

    let (status, created) = send(
        &app.router,
        Method::POST,
        "/api/records",
        Some(json!({
            "name": "Example Error",
            "url": "https://nonexistent-site.example",
            "statusCode": 404,
            "responseTimeMs": 100,
            "errorMessage": "Not Found"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Example Error");
    assert_eq!(created["statusCode"], 404);
    assert_eq!(created["errorMessage"], "Not Found");
    let id = created["id"].as_i64().expect("id should be assigned");

    let (status, fetched) = send(&app.router, Method::GET, &format!("/api/records/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_unknown_record_returns_404() {
    let app = create_test_app().await;

    let (status, body) = send(&app.router, Method::GET, "/api/records/424242", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found_error");
}

#[tokio::test]
async fn test_create_record_rejects_invalid_body() {
    let app = create_test_app().await;

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/records",
        Some(record_body("Google", "https://www.google.com", 200, -5)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/records",
        Some(json!({ "name": "Google" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/records",
        Some(record_body("", "https://www.google.com", 200, 5)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = send(&app.router, Method::GET, "/api/records", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_list_and_filter_by_name() {
    let app = create_test_app().await;
    for (name, url) in [
        ("Google", "https://www.google.com"),
        ("GitHub", "https://github.com"),
        ("Google", "https://google.com"),
    ] {
        send(&app.router, Method::POST, "/api/records", Some(record_body(name, url, 200, 10))).await;
    }

    let (status, all) = send(&app.router, Method::GET, "/api/records", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, google) = send(&app.router, Method::GET, "/api/records/name/Google", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(google.as_array().unwrap().len(), 2);

    let (_, unknown) = send(&app.router, Method::GET, "/api/records/name/Nobody", None).await;
    assert_eq!(unknown, json!([]));
}

#[tokio::test]
async fn test_last_seconds_window() {
    let app = create_test_app().await;
    let now = app.clock.now();

    for offset in [10, 5, 1] {
        app.clock.set_time(now - Duration::seconds(offset));
        send(
            &app.router,
            Method::POST,
            "/api/records",
            Some(record_body("A", "X", 200, offset)),
        )
        .await;
    }
    app.clock.set_time(now);

    let (status, recent) = send(&app.router, Method::GET, "/api/records/last/6", None).await;
    assert_eq!(status, StatusCode::OK);
    let latencies: Vec<i64> = recent
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["responseTimeMs"].as_i64().unwrap())
        .collect();
    assert_eq!(latencies, vec![1, 5]);

    let (status, body) = send(&app.router, Method::GET, "/api/records/last/-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_non_numeric_path_returns_json_error() {
    let app = create_test_app().await;

    for (method, uri) in [
        (Method::GET, "/api/records/abc"),
        (Method::DELETE, "/api/records/abc"),
        (Method::GET, "/api/records/last/soon"),
    ] {
        let (status, body) = send(&app.router, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["type"], "invalid_request_error", "{uri}");
        assert_eq!(body["error"]["code"], "400", "{uri}");
    }
}

#[tokio::test]
async fn test_unique_returns_latest_per_name_and_url() {
    let app = create_test_app().await;

    for (url, latency) in [("X", 1), ("X", 2), ("X", 3), ("Y", 4), ("Y", 5)] {
        app.clock.advance(Duration::seconds(1));
        send(
            &app.router,
            Method::POST,
            "/api/records",
            Some(record_body("A", url, 200, latency)),
        )
        .await;
    }

    let (status, unique) = send(&app.router, Method::GET, "/api/records/unique", None).await;
    assert_eq!(status, StatusCode::OK);

    let mut latest: Vec<(String, i64)> = unique
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["url"].as_str().unwrap().to_string(),
                r["responseTimeMs"].as_i64().unwrap(),
            )
        })
        .collect();
    latest.sort();
    assert_eq!(latest, vec![("X".to_string(), 3), ("Y".to_string(), 5)]);
}

#[tokio::test]
async fn test_name_since_timestamp() {
    let app = create_test_app().await;
    let start = app.clock.now();

    send(&app.router, Method::POST, "/api/records", Some(record_body("A", "X", 200, 1))).await;
    app.clock.advance(Duration::hours(2));
    send(&app.router, Method::POST, "/api/records", Some(record_body("A", "X", 200, 2))).await;

    let since = (start + Duration::hours(1))
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    let (status, found) = send(
        &app.router,
        Method::GET,
        &format!("/api/records/name/A/since/{since}"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["responseTimeMs"], 2);
}

#[tokio::test]
async fn test_name_since_invalid_timestamp_returns_400() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/records/name/A/since/not-a-date",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Invalid timestamp format. Use ISO format (e.g., '2023-06-15T10:15:30')"
    );
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = create_test_app().await;
    let (_, created) = send(
        &app.router,
        Method::POST,
        "/api/records",
        Some(record_body("A", "X", 200, 1)),
    )
    .await;
    let uri = format!("/api/records/{}", created["id"]);

    let (status, _) = send(&app.router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app.router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app.router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;
    let (status, body) = send(&app.router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
