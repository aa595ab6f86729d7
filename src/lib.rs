//! アウトバウンドHTTPコールの監査ログサービス
//!
//! 金融トランザクションクライアントが発行する全アウトバウンドHTTPコールを
//! SQLiteへ永続化し、日付範囲フィルタとページネーション付きで照会する。
//! 書き込み失敗は呼び出し元の業務処理へ決して伝播しない。

#![warn(missing_docs)]

/// 共通型定義（エラー型）
pub mod common;

/// 設定管理（環境変数ヘルパーとストレージ能力プロファイル）
pub mod config;

/// データベースアクセス
pub mod db;

/// 運用診断チャネル
pub mod diagnostics;

/// ロギング初期化ユーティリティ
pub mod logging;
