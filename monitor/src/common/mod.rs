//! 共通モジュール
//!
//! エラー型など、各層で共有する定義

/// エラー型定義
pub mod error;
