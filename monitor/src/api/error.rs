//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::{CommonError, MonitorError};
use axum::{response::IntoResponse, Json};

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub MonitorError);

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        AppError(err)
    }
}

impl From<CommonError> for AppError {
    fn from(err: CommonError) -> Self {
        AppError(MonitorError::Common(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // クライアントには external_message() のみ返し、詳細はログに残す
        if self.0.is_client_error() {
            tracing::debug!(error = %self.0, "Rejected request");
        } else {
            tracing::error!(error = %self.0, "Request failed");
        }

        (self.0.status_code(), Json(self.0.to_error_response())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_timestamp_maps_to_bad_request() {
        let response =
            AppError(MonitorError::InvalidTimestampFormat("yesterday".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["type"], "invalid_request_error");
        assert_eq!(
            json["error"]["message"],
            "Invalid timestamp format. Use ISO format (e.g., '2023-06-15T10:15:30')"
        );
    }

    #[tokio::test]
    async fn database_error_hides_details() {
        let response =
            AppError(MonitorError::Database("disk I/O error at /srv/db".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Database error");
        assert!(!json.to_string().contains("/srv/db"));
    }

    #[tokio::test]
    async fn validation_error_from_common() {
        let response: axum::response::Response =
            AppError::from(CommonError::Validation("name must not be empty".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
