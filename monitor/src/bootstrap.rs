//! 起動時の初期化処理
//!
//! ストアが空の場合にサンプルの監視レコードを投入する。

use crate::common::error::MonitorResult;
use crate::db::records::RecordStore;
use crate::types::observation::NewObservation;
use tracing::info;

/// 投入するサンプルレコード
fn sample_observations() -> Vec<NewObservation> {
    vec![
        NewObservation::new("Google", "https://www.google.com", 200, 150, None),
        NewObservation::new("GitHub", "https://github.com", 200, 250, None),
        NewObservation::new(
            "Example Error",
            "https://nonexistent-site.example",
            404,
            100,
            Some("Not Found".to_string()),
        ),
    ]
}

/// ストアが空ならサンプルデータを投入し、投入件数を返す
pub async fn seed_sample_data_if_empty(store: &RecordStore) -> MonitorResult<usize> {
    let existing = store.count().await?;
    if existing > 0 {
        info!(
            existing,
            "Database already contains records, skipping sample data"
        );
        return Ok(0);
    }

    let samples = sample_observations();
    let count = samples.len();
    for sample in samples {
        store.save(sample).await?;
    }

    info!(count, "Sample data inserted");
    Ok(count)
}
