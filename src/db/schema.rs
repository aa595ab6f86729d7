//! スキーマ定義
//!
//! 監査ログテーブルとインデックスの適用（apply）・取り消し（revert）。
//! インデックス作成はエンジン名ではなく [`StorageProfile`] の能力で分岐する。

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::common::error::{AuditError, AuditResult};
use crate::config::StorageProfile;

/// データベースに接続し、スキーマを適用したプールを返す
///
/// ファイルが存在しない場合は作成する。
pub async fn initialize_database(
    database_url: &str,
    profile: &StorageProfile,
) -> AuditResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AuditError::Config(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| AuditError::Database(format!("Failed to connect to database: {}", e)))?;

    apply(&pool, profile).await?;

    Ok(pool)
}

/// 監査ログテーブルとインデックスを作成する
///
/// 冪等: 既に存在する場合は何もしない。
pub async fn apply(pool: &SqlitePool, profile: &StorageProfile) -> AuditResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS http_call_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url VARCHAR(1000) NOT NULL,
            method VARCHAR(20) NOT NULL,
            duration_ms INTEGER NOT NULL,
            status_code INTEGER,
            request_body TEXT,
            response_body TEXT,
            request_headers TEXT,
            response_headers TEXT,
            error_message VARCHAR(1000),
            success BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AuditError::Database(format!("Failed to create http_call_logs table: {}", e)))?;

    for column in ["created_at", "method", "status_code", "success"] {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS idx_http_call_logs_{col} ON http_call_logs ({col})",
            col = column
        );
        sqlx::query(&sql).execute(pool).await.map_err(|e| {
            AuditError::Database(format!("Failed to create index on {}: {}", column, e))
        })?;
    }

    // urlカラムはインデックスキー幅に上限のあるエンジンでは全幅で張れない。
    // 上限がある場合は先頭N文字の式インデックスにフォールバックする。
    let url_index_sql = match profile.max_index_key_chars {
        Some(max_chars) => format!(
            "CREATE INDEX IF NOT EXISTS idx_http_call_logs_url ON http_call_logs (substr(url, 1, {}))",
            max_chars
        ),
        None => {
            "CREATE INDEX IF NOT EXISTS idx_http_call_logs_url ON http_call_logs (url)".to_string()
        }
    };
    sqlx::query(&url_index_sql)
        .execute(pool)
        .await
        .map_err(|e| AuditError::Database(format!("Failed to create index on url: {}", e)))?;

    Ok(())
}

/// 監査ログテーブルを削除する
///
/// インデックスはテーブルと共に削除される。冪等。
pub async fn revert(pool: &SqlitePool) -> AuditResult<()> {
    sqlx::query("DROP TABLE IF EXISTS http_call_logs")
        .execute(pool)
        .await
        .map_err(|e| AuditError::Database(format!("Failed to drop http_call_logs table: {}", e)))?;

    Ok(())
}
