// データベース初期化とマイグレーション実行

use crate::common::error::MonitorError;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// SQLiteデータベース接続プールを作成してマイグレーションを実行
///
/// # Arguments
/// * `database_url` - データベースURL（例: "sqlite:data/monitor.db"）
///
/// # Returns
/// * `Ok(SqlitePool)` - スキーマ作成済みのデータベースプール
/// * `Err(MonitorError::SchemaInitialization)` - 初期化失敗（起動を中止すべき）
pub async fn initialize_database(database_url: &str) -> Result<SqlitePool, MonitorError> {
    let pool = connect(database_url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// 接続プールを作成する（ファイルが無ければ作成）
pub async fn connect(database_url: &str) -> Result<SqlitePool, MonitorError> {
    ensure_parent_dir(database_url)?;

    let connect_options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| {
            MonitorError::SchemaInitialization(format!("Invalid database URL: {}", e))
        })?
        .create_if_missing(true);

    SqlitePool::connect_with(connect_options)
        .await
        .map_err(|e| MonitorError::SchemaInitialization(format!("Failed to connect: {}", e)))
}

/// マイグレーションを実行（sqlx::migrate!マクロを使用）
///
/// 適用済みのマイグレーションはスキップされ、SQL自体も`IF NOT EXISTS`で
/// 記述しているため、何度呼び出してもエラーにならない。
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MonitorError> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            MonitorError::SchemaInitialization(format!("Failed to run migrations: {}", e))
        })?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// SQLiteファイルの親ディレクトリを作成する
///
/// SQLiteファイルはディレクトリが存在しないと作成できないため、先に作成しておく。
fn ensure_parent_dir(database_url: &str) -> Result<(), MonitorError> {
    let Some(path) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    // `sqlite::memory:` のような特殊指定はスキップ
    if path.starts_with(':') {
        return Ok(());
    }

    // `sqlite://` 形式に備えてスラッシュを除去し、クエリ部分を除外
    let normalized = path.trim_start_matches("//");
    let path_without_params = normalized.split('?').next().unwrap_or(normalized);
    let db_path = Path::new(path_without_params);

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MonitorError::SchemaInitialization(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
            tracing::info!("Created data directory at {}", parent.display());
        }
    }

    Ok(())
}
