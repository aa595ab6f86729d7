//! 運用診断チャネル
//!
//! 書き込み試行・成功・失敗をプロセス全体のログへ通知する注入可能なシンク。
//! 直接tracingを呼ばずtraitを経由することで、テストでは
//! キャプチャ実装に差し替えて発行メッセージを検証できる。

use std::sync::Arc;

/// 運用診断シンク
///
/// 配送保証はない（fire-and-forget）。
pub trait Diagnostics: Send + Sync {
    /// 情報メッセージを通知
    fn info(&self, message: &str);

    /// エラーメッセージを通知
    fn error(&self, message: &str, error: &dyn std::fmt::Display);
}

/// 共有診断シンク
pub type SharedDiagnostics = Arc<dyn Diagnostics>;

/// tracingへ転送するデフォルト実装
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, message: &str, error: &dyn std::fmt::Display) {
        tracing::error!("{}: {}", message, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_diagnostics_does_not_panic() {
        let sink = TracingDiagnostics;
        sink.info("write attempted");
        sink.error("write failed", &"connection refused");
    }

    #[test]
    fn test_shared_diagnostics_trait_object() {
        let sink: SharedDiagnostics = Arc::new(TracingDiagnostics);
        sink.info("shared sink works");
    }
}
