//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables and the
//! storage capability profile used by the schema definition.

/// Get an environment variable with a default value
///
/// # Arguments
/// * `name` - The environment variable name
/// * `default` - The default value to return if the variable is not set
pub fn get_env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable, parsing to a specific type
///
/// # Arguments
/// * `name` - The environment variable name
/// * `default` - The default value to return if the variable is not set or parsing fails
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// データベースURLを取得
///
/// 環境変数 `CALLAUDIT_DATABASE_URL` から取得し、
/// 未設定の場合は `sqlite:callaudit.db` を返す。
pub fn database_url() -> String {
    get_env_or("CALLAUDIT_DATABASE_URL", "sqlite:callaudit.db")
}

/// ストレージエンジンの能力プロファイル
///
/// スキーマ定義はエンジン名ではなくこのプロファイルで分岐する。
/// 新しいエンジンは能力を宣言するだけで対応できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageProfile {
    /// インデックスキー幅の上限（文字数）。Noneなら全幅インデックス可能。
    ///
    /// urlカラムは最大1000文字なので、上限のあるエンジンでは
    /// この幅のプレフィックスインデックスを作成する。
    pub max_index_key_chars: Option<u32>,
}

impl StorageProfile {
    /// キー幅に上限のないエンジン（SQLite等）向けプロファイル
    pub fn unbounded() -> Self {
        Self {
            max_index_key_chars: None,
        }
    }

    /// キー幅上限のあるエンジン向けプロファイル
    pub fn bounded(max_index_key_chars: u32) -> Self {
        Self {
            max_index_key_chars: Some(max_index_key_chars),
        }
    }

    /// 環境変数からプロファイルを構築
    ///
    /// `CALLAUDIT_MAX_INDEX_KEY_CHARS` が正の整数で設定されていれば上限付き、
    /// 未設定または0なら全幅インデックスとする。
    pub fn from_env() -> Self {
        let max_chars = get_env_parse("CALLAUDIT_MAX_INDEX_KEY_CHARS", 0u32);
        if max_chars > 0 {
            Self::bounded(max_chars)
        } else {
            Self::unbounded()
        }
    }
}

impl Default for StorageProfile {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_env_or_set() {
        std::env::set_var("CALLAUDIT_TEST_VAR", "custom");
        assert_eq!(get_env_or("CALLAUDIT_TEST_VAR", "default"), "custom");
        std::env::remove_var("CALLAUDIT_TEST_VAR");
    }

    #[test]
    #[serial]
    fn test_get_env_or_unset() {
        std::env::remove_var("CALLAUDIT_TEST_VAR");
        assert_eq!(get_env_or("CALLAUDIT_TEST_VAR", "default"), "default");
    }

    #[test]
    #[serial]
    fn test_get_env_parse_invalid_falls_back() {
        std::env::set_var("CALLAUDIT_TEST_NUM", "not-a-number");
        assert_eq!(get_env_parse("CALLAUDIT_TEST_NUM", 42u32), 42);
        std::env::remove_var("CALLAUDIT_TEST_NUM");
    }

    #[test]
    #[serial]
    fn test_database_url_default() {
        std::env::remove_var("CALLAUDIT_DATABASE_URL");
        assert_eq!(database_url(), "sqlite:callaudit.db");
    }

    #[test]
    #[serial]
    fn test_storage_profile_from_env_bounded() {
        std::env::set_var("CALLAUDIT_MAX_INDEX_KEY_CHARS", "255");
        assert_eq!(StorageProfile::from_env(), StorageProfile::bounded(255));
        std::env::remove_var("CALLAUDIT_MAX_INDEX_KEY_CHARS");
    }

    #[test]
    #[serial]
    fn test_storage_profile_from_env_unbounded() {
        std::env::remove_var("CALLAUDIT_MAX_INDEX_KEY_CHARS");
        assert_eq!(StorageProfile::from_env(), StorageProfile::unbounded());
    }

    #[test]
    fn test_storage_profile_default_is_unbounded() {
        assert_eq!(StorageProfile::default().max_index_key_chars, None);
    }
}
