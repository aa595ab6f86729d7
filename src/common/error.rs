//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// 監査ログサービスのエラー型
#[derive(Debug, Error)]
pub enum AuditError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type AuditResult<T> = Result<T, AuditError>;
