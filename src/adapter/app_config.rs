use crate::adapter::database_config::ConfigError;
use crate::application::service::InventoryControlConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// チケットストアの実装
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// MySQL（永続化あり）
    MySql,
    /// インメモリ（開発・デモ用、再起動で消える）
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(StoreBackend::MySql),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::InvalidValue(format!(
                "Invalid STORE_BACKEND: {} (expected mysql or memory)",
                other
            ))),
        }
    }
}

/// アプリケーション全体の設定
/// データベース接続以外の設定を環境変数から読み取る
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: String,
    pub store_backend: StoreBackend,
    pub inventory: InventoryControlConfig,
}

impl AppConfig {
    /// 環境変数から設定を読み取る
    /// 環境変数が設定されていない場合はデフォルト値を使用
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_addr = string_var("SERVER_ADDR", "0.0.0.0:3000");

        let store_backend = string_var("STORE_BACKEND", "mysql").parse::<StoreBackend>()?;

        let max_attempts = parse_var::<u32>("INVENTORY_MAX_ATTEMPTS", "5")?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "INVENTORY_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        let retry_delay_ms = parse_var::<u64>("INVENTORY_RETRY_DELAY_MS", "10")?;

        let operation_timeout_ms = parse_var::<u64>("INVENTORY_OPERATION_TIMEOUT_MS", "5000")?;
        if operation_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "INVENTORY_OPERATION_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            server_addr,
            store_backend,
            inventory: InventoryControlConfig {
                max_attempts,
                retry_delay: Duration::from_millis(retry_delay_ms),
                operation_timeout: Duration::from_millis(operation_timeout_ms),
            },
        })
    }
}

/// 文字列の環境変数を読み取る（未設定ならデフォルト値）
pub(crate) fn string_var(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// 環境変数を読み取って型変換する（未設定ならデフォルト値）
pub(crate) fn parse_var<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    string_var(name, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", name, e)))
}
