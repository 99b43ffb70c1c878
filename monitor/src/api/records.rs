//! 監視レコードAPIハンドラー
//!
//! `/api/records` 系のエンドポイント

use super::error::AppError;
use crate::common::error::{CommonError, MonitorError};
use crate::retention::{CleanupOutcome, CleanupReport};
use crate::types::observation::{NewObservation, Observation};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// レコード作成リクエスト
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    /// 監視対象の論理名
    pub name: String,
    /// チェック対象URL
    pub url: String,
    /// HTTPステータスコード
    pub status_code: i32,
    /// レスポンスタイム（ミリ秒、0以上）
    pub response_time_ms: i64,
    /// 失敗時のエラーメッセージ
    #[serde(default)]
    pub error_message: Option<String>,
}

impl TryFrom<RecordRequest> for NewObservation {
    type Error = CommonError;

    fn try_from(request: RecordRequest) -> Result<Self, Self::Error> {
        let response_time_ms = u64::try_from(request.response_time_ms).map_err(|_| {
            CommonError::Validation("responseTimeMs must not be negative".to_string())
        })?;

        let new = NewObservation::new(
            request.name,
            request.url,
            request.status_code,
            response_time_ms,
            request.error_message,
        );
        new.validate()?;
        Ok(new)
    }
}

/// 手動クリーンアップのクエリパラメータ
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupParams {
    /// 保持期間（日）。省略時は設定値を使用
    pub retention_days: Option<u32>,
}

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 常に"ok"
    pub status: String,
}

/// パスパラメータの抽出失敗を検証エラーへ変換する
///
/// axum標準のプレーンテキスト応答ではなく、共通のJSONエラー形式で返すため。
fn path_param<T>(path: Result<Path<T>, PathRejection>) -> Result<T, CommonError> {
    path.map(|Path(value)| value).map_err(|rejection| {
        CommonError::Validation(format!("Invalid path parameter: {}", rejection.body_text()))
    })
}

/// POST /api/records - レコード作成
pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<RecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Observation>), AppError> {
    let Json(request) = payload.map_err(|rejection| {
        CommonError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let new = NewObservation::try_from(request)?;
    let saved = state.store.save(new).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/records - 全レコード取得
pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<Observation>>, AppError> {
    Ok(Json(state.queries.list_all().await?))
}

/// GET /api/records/{id} - IDでレコード取得
pub async fn get_record(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Observation>, AppError> {
    let id = path_param(id)?;
    state
        .queries
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError(MonitorError::NotFound(id.to_string())))
}

/// GET /api/records/name/{name} - 名前でレコード取得
pub async fn get_records_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Observation>>, AppError> {
    Ok(Json(state.queries.by_name(&name).await?))
}

/// GET /api/records/last/{seconds} - 直近N秒のレコード取得
pub async fn get_recent_records(
    State(state): State<AppState>,
    seconds: Result<Path<u64>, PathRejection>,
) -> Result<Json<Vec<Observation>>, AppError> {
    let seconds = path_param(seconds)?;
    Ok(Json(state.queries.since_duration(seconds).await?))
}

/// GET /api/records/unique - `(name, url)`ごとの最新レコード取得
pub async fn get_unique_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<Observation>>, AppError> {
    Ok(Json(state.queries.latest_per_key().await?))
}

/// GET /api/records/name/{name}/since/{timestamp} - 指定時刻以降のレコード取得
pub async fn get_records_by_name_since(
    State(state): State<AppState>,
    Path((name, timestamp)): Path<(String, String)>,
) -> Result<Json<Vec<Observation>>, AppError> {
    Ok(Json(state.queries.since_timestamp(&name, &timestamp).await?))
}

/// DELETE /api/records/{id} - レコード削除（存在しないIDでも204）
pub async fn delete_record(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_param(id)?;
    if !state.store.delete_by_id(id).await? {
        tracing::debug!(id, "Delete requested for unknown record");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/records/cleanup - 保持期間クリーンアップの手動実行
pub async fn run_cleanup(
    State(state): State<AppState>,
    params: Result<Query<CleanupParams>, QueryRejection>,
) -> Result<Json<CleanupReport>, AppError> {
    let Query(params) = params.map_err(|rejection| {
        CommonError::Validation(format!("Invalid query string: {}", rejection.body_text()))
    })?;
    let retention_days = params
        .retention_days
        .or_else(|| state.retention_config.effective_days())
        .ok_or_else(|| {
            CommonError::Validation(
                "retentionDays is required while scheduled retention is disabled".to_string(),
            )
        })?;

    match state.retention.run(retention_days).await? {
        CleanupOutcome::Completed(report) => Ok(Json(report)),
        CleanupOutcome::Skipped => Err(AppError(MonitorError::CleanupInProgress)),
    }
}

/// GET /health - 死活監視
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
