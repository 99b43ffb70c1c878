//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `MonitorError`は`error_type()`と`status_code()`を提供し、
//! API層で一貫したエラーレスポンスを生成できます。

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// monitor persistence error type
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Resource not found (API境界でのみ使用。ストアの検索は`Option`を返す)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied a timestamp that is not ISO-8601
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestampFormat(String),

    /// A retention cleanup is already in flight
    #[error("Cleanup already running")]
    CleanupInProgress,

    /// Storage engine unreachable or a statement failed
    #[error("Database error: {0}")]
    Database(String),

    /// Required schema could not be created at startup
    #[error("Schema initialization failed: {0}")]
    SchemaInitialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MonitorError {
    /// Returns a safe error message for external clients.
    ///
    /// Storage details stay in server logs; use `to_string()` there.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Common(CommonError::Validation(_)) => "Invalid request",
            Self::Common(_) => "Request error",
            Self::NotFound(_) => "Record not found",
            Self::InvalidTimestampFormat(_) => {
                "Invalid timestamp format. Use ISO format (e.g., '2023-06-15T10:15:30')"
            }
            Self::CleanupInProgress => "Cleanup already running",
            Self::Database(_) => "Database error",
            Self::SchemaInitialization(_) => "Storage not initialized",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns the error type string used in API error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Common(_) => "invalid_request_error",
            Self::NotFound(_) => "not_found_error",
            Self::InvalidTimestampFormat(_) => "invalid_request_error",
            Self::CleanupInProgress => "conflict_error",
            Self::Database(_) => "server_error",
            Self::SchemaInitialization(_) => "server_error",
            Self::Internal(_) => "server_error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Common(CommonError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Common(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTimestampFormat(_) => StatusCode::BAD_REQUEST,
            Self::CleanupInProgress => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SchemaInitialization(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 呼び出し側の入力に起因するエラーか
    ///
    /// クライアントエラーはシステム障害としてログ出力しない。
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Converts this error to the JSON error body.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                message: self.external_message().to_string(),
                error_type: self.error_type().to_string(),
                code: Some(self.status_code().as_u16().to_string()),
            },
        }
    }
}

/// APIエラーレスポンス
///
/// ```json
/// {
///   "error": {
///     "message": "Record not found",
///     "type": "not_found_error",
///     "code": "404"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// The error details
    pub error: ErrorDetail,
}

/// エラー詳細
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Human-readable error message
    pub message: String,
    /// Error type (e.g., "invalid_request_error", "server_error")
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error code (HTTP status as string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Result type alias (Common)
pub type CommonResult<T> = Result<T, CommonError>;

/// Result type alias (monitor persistence)
pub type MonitorResult<T> = Result<T, MonitorError>;
