//! リポジトリtrait定義
//!
//! ストレージ実装を抽象化し、テストでモックに差し替え可能にする。

use async_trait::async_trait;

use crate::common::error::AuditResult;
use crate::db::call_log::{CallLogEntry, CallLogStorage, LogPage, LogQuery, RecordOutcome};

/// 監査ログリポジトリ
#[async_trait]
pub trait CallLogRepository: Send + Sync {
    /// 1コール分の監査ログを記録する（呼び出し元を失敗させない）
    async fn record(&self, entry: &CallLogEntry) -> RecordOutcome;

    /// 監査ログを検索する
    async fn query(&self, query: &LogQuery) -> AuditResult<LogPage>;
}

#[async_trait]
impl CallLogRepository for CallLogStorage {
    async fn record(&self, entry: &CallLogEntry) -> RecordOutcome {
        CallLogStorage::record(self, entry).await
    }

    async fn query(&self, query: &LogQuery) -> AuditResult<LogPage> {
        CallLogStorage::query(self, query).await
    }
}
