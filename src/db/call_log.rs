//! HTTPコール監査ログの記録・検索
//!
//! 外部APIへの全アウトバウンドHTTPコールを記録する。
//! 記録（record）は呼び出し元を決して失敗させない:
//! ストレージ障害時は診断を発行して [`RecordOutcome::NotRecorded`] を返す。
//! 検索（query）は通常のResultでエラーを伝播する。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::common::error::{AuditError, AuditResult};
use crate::diagnostics::{Diagnostics, SharedDiagnostics, TracingDiagnostics};

/// ページサイズのデフォルト値
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// 記録対象の1コール分の情報
///
/// created_at は書き込み時にストレージ層が付与する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLogEntry {
    /// リクエスト先URL
    pub url: String,
    /// HTTPメソッド
    pub method: String,
    /// 所要時間（ミリ秒）
    pub duration_ms: i64,
    /// HTTPステータスコード（レスポンス未到達時はNone）
    pub status_code: Option<i64>,
    /// リクエストボディ（シリアライズ済み）
    pub request_body: Option<String>,
    /// レスポンスボディ（シリアライズ済み）
    pub response_body: Option<String>,
    /// リクエストヘッダ（シリアライズ済み）
    pub request_headers: Option<String>,
    /// レスポンスヘッダ（シリアライズ済み）
    pub response_headers: Option<String>,
    /// エラーメッセージ（失敗時のみ）
    pub error_message: Option<String>,
    /// コールが成功したか
    pub success: bool,
}

/// 永続化済みの監査レコード
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    /// 一意なレコードID（正の整数）
    pub id: i64,
    /// リクエスト先URL
    pub url: String,
    /// HTTPメソッド
    pub method: String,
    /// 所要時間（ミリ秒）
    pub duration_ms: i64,
    /// HTTPステータスコード
    pub status_code: Option<i64>,
    /// リクエストボディ
    pub request_body: Option<String>,
    /// レスポンスボディ
    pub response_body: Option<String>,
    /// リクエストヘッダ
    pub request_headers: Option<String>,
    /// レスポンスヘッダ
    pub response_headers: Option<String>,
    /// エラーメッセージ
    pub error_message: Option<String>,
    /// コールが成功したか
    pub success: bool,
    /// 記録日時（UTC）
    pub created_at: DateTime<Utc>,
}

/// 記録操作の結果
///
/// ストレージ障害は呼び出し元のトランザクションを失敗させないため、
/// Resultではなくこの列挙型で表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// 記録成功。保存されたレコードのID（正の整数）。
    Recorded(i64),
    /// 記録失敗。詳細は診断チャネルに発行済み。
    NotRecorded,
}

impl RecordOutcome {
    /// 数値ID表現を返す。未記録の場合は番兵値0。
    ///
    /// 有効なIDは常に正なので、0は「記録されなかった」ことを一意に示す。
    pub fn id(&self) -> i64 {
        match self {
            RecordOutcome::Recorded(id) => *id,
            RecordOutcome::NotRecorded => 0,
        }
    }

    /// 記録に成功したか
    pub fn is_recorded(&self) -> bool {
        matches!(self, RecordOutcome::Recorded(_))
    }
}

/// 検索条件
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// 記録日時の下限（含む）
    pub start_date: Option<DateTime<Utc>>,
    /// 記録日時の上限（含む）
    pub end_date: Option<DateTime<Utc>>,
    /// ページ番号（1始まり、デフォルト1）
    pub page: Option<i64>,
    /// 1ページあたりの件数（デフォルト50）
    pub page_size: Option<i64>,
}

/// ページネーションメタデータ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// フィルタに合致した総件数
    pub total: i64,
    /// 現在のページ番号
    pub page: i64,
    /// 1ページあたりの件数
    pub page_size: i64,
    /// 総ページ数（total=0なら0）
    pub total_pages: i64,
}

/// 検索結果の1ページ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPage {
    /// 新しい順に並んだレコード
    pub logs: Vec<CallRecord>,
    /// ページネーションメタデータ
    pub pagination: Pagination,
}

/// データベース行の中間表現
#[derive(Debug, sqlx::FromRow)]
struct CallLogRow {
    id: i64,
    url: String,
    method: String,
    duration_ms: i64,
    status_code: Option<i64>,
    request_body: Option<String>,
    response_body: Option<String>,
    request_headers: Option<String>,
    response_headers: Option<String>,
    error_message: Option<String>,
    success: i64,
    created_at: String,
}

impl TryFrom<CallLogRow> for CallRecord {
    type Error = AuditError;

    fn try_from(row: CallLogRow) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| {
                AuditError::Database(format!(
                    "Invalid created_at timestamp '{}': {}",
                    row.created_at, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(CallRecord {
            id: row.id,
            url: row.url,
            method: row.method,
            duration_ms: row.duration_ms,
            status_code: row.status_code,
            request_body: row.request_body,
            response_body: row.response_body,
            request_headers: row.request_headers,
            response_headers: row.response_headers,
            error_message: row.error_message,
            success: row.success != 0,
            created_at,
        })
    }
}

/// 監査ログストレージ
#[derive(Clone)]
pub struct CallLogStorage {
    pool: SqlitePool,
    diagnostics: SharedDiagnostics,
}

impl CallLogStorage {
    /// デフォルトの診断チャネル（tracing）でストレージを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_diagnostics(pool, Arc::new(TracingDiagnostics))
    }

    /// 診断チャネルを指定してストレージを作成
    pub fn with_diagnostics(pool: SqlitePool, diagnostics: SharedDiagnostics) -> Self {
        Self { pool, diagnostics }
    }

    /// 1コール分の監査ログを記録する
    ///
    /// この操作は決して呼び出し元を失敗させない。
    /// ストレージ障害時は診断を発行し [`RecordOutcome::NotRecorded`] を返す。
    pub async fn record(&self, entry: &CallLogEntry) -> RecordOutcome {
        let status = entry
            .status_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        self.diagnostics.info(&format!(
            "Recording outbound call: {} {} - {}ms - status: {}",
            entry.method, entry.url, entry.duration_ms, status
        ));

        match self.insert_entry(entry).await {
            Ok(id) => {
                self.diagnostics
                    .info(&format!("Outbound call recorded with id {}", id));
                RecordOutcome::Recorded(id)
            }
            Err(e) => {
                self.diagnostics.error("Failed to record outbound call", &e);
                RecordOutcome::NotRecorded
            }
        }
    }

    async fn insert_entry(&self, entry: &CallLogEntry) -> AuditResult<i64> {
        // created_at は挿入時にアプリケーション側で付与する。
        // フィルタ境界と同じ to_rfc3339 表現にすることで辞書順比較が成立する。
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO http_call_logs (
                url, method, duration_ms, status_code,
                request_body, response_body, request_headers, response_headers,
                error_message, success, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.url)
        .bind(&entry.method)
        .bind(entry.duration_ms)
        .bind(entry.status_code)
        .bind(&entry.request_body)
        .bind(&entry.response_body)
        .bind(&entry.request_headers)
        .bind(&entry.response_headers)
        .bind(&entry.error_message)
        .bind(entry.success)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuditError::Database(format!("Failed to insert call log: {}", e)))?;

        let id = result.last_insert_rowid();
        if id <= 0 {
            return Err(AuditError::Database(format!(
                "Insert returned non-positive row id: {}",
                id
            )));
        }

        Ok(id)
    }

    /// 監査ログを検索する
    ///
    /// 日付範囲は両端とも含む。結果は記録日時の新しい順
    /// （同時刻はIDの大きい順）で返す。
    pub async fn query(&self, query: &LogQuery) -> AuditResult<LogPage> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let offset = (page - 1) * page_size;

        let (where_clause, params) = build_where_clause(query);

        let count_sql = format!("SELECT COUNT(*) FROM http_call_logs{}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in &params {
            count_query = count_query.bind(param);
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuditError::Database(format!("Failed to count call logs: {}", e)))?;

        let select_sql = format!(
            r#"
            SELECT id, url, method, duration_ms, status_code,
                   request_body, response_body, request_headers, response_headers,
                   error_message, success, created_at
            FROM http_call_logs{}
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            where_clause
        );
        let mut select_query = sqlx::query_as::<_, CallLogRow>(&select_sql);
        for param in &params {
            select_query = select_query.bind(param);
        }
        let rows = select_query
            .bind(page_size)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuditError::Database(format!("Failed to fetch call logs: {}", e)))?;

        let logs = rows
            .into_iter()
            .map(CallRecord::try_from)
            .collect::<AuditResult<Vec<_>>>()?;

        let total_pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };

        Ok(LogPage {
            logs,
            pagination: Pagination {
                total,
                page,
                page_size,
                total_pages,
            },
        })
    }
}

/// 検索条件からWHERE句とバインドパラメータを構築する
fn build_where_clause(query: &LogQuery) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some(start) = query.start_date {
        conditions.push("created_at >= ?".to_string());
        params.push(start.to_rfc3339());
    }

    if let Some(end) = query.end_date {
        conditions.push("created_at <= ?".to_string());
        params.push(end.to_rfc3339());
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}
