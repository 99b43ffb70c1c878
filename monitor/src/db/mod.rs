//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

/// データベースマイグレーション
pub mod migrations;

/// 監視レコードストレージ
pub mod records;

/// Repository traitパターン（テスタビリティ向上）
pub mod traits;
