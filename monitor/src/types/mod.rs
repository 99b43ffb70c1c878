//! 型定義モジュール
//!
//! ドメインエンティティの型定義を提供

/// 監視レコード（Observation）関連の型定義
pub mod observation;

pub use observation::{NewObservation, Observation};
