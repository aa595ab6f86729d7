//! データベースアクセス層
//!
//! スキーマ定義と監査ログの記録・検索を提供する。

pub mod call_log;
pub mod schema;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::config::StorageProfile;
    use sqlx::SqlitePool;

    /// テスト用のインメモリDBプールを作成し、スキーマを適用する
    pub async fn test_db_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory pool");
        super::schema::apply(&pool, &StorageProfile::unbounded())
            .await
            .expect("Failed to apply schema");
        pool
    }
}
