use crate::adapter::app_config::{parse_var, string_var};
use std::time::Duration;
use thiserror::Error;

/// データベース接続設定を管理する構造体
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
    /// プールから接続を取得する際のタイムアウト
    /// 超過した場合はストア到達不能として扱う
    pub acquire_timeout: Duration,
}

/// 設定エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl DatabaseConfig {
    /// `DATABASE_*` 環境変数から設定を読み取る
    /// 未設定の項目はローカル開発用のデフォルト値を使う
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", "10")?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host: string_var("DATABASE_HOST", "localhost"),
            port: parse_var("DATABASE_PORT", "3306")?,
            database: string_var("DATABASE_NAME", "ticketing_db"),
            username: string_var("DATABASE_USER", "ticketing_user"),
            password: string_var("DATABASE_PASSWORD", "ticketing_password"),
            max_connections,
            acquire_timeout: Duration::from_secs(parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", "3")?),
        })
    }

    /// MySQL接続文字列を生成
    pub fn connection_string(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}
