use sqlx::{MySql, Pool};
use tracing::info;
use crate::adapter::database_error::DatabaseError;

/// マイグレーションファイルのリスト（適用順）
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_create_tickets_table",
    include_str!("../../migrations/001_create_tickets_table.sql"),
)];

/// データベースマイグレーションを管理する構造体
pub struct DatabaseMigration {
    pool: Pool<MySql>,
}

impl DatabaseMigration {
    /// 新しいDatabaseMigrationインスタンスを作成
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// マイグレーションを実行
    /// べき等性を保証（CREATE TABLE IF NOT EXISTS）
    pub async fn run(&self) -> Result<(), DatabaseError> {
        for (name, migration_sql) in MIGRATIONS {
            info!(migration = name, "Running migration");
            sqlx::query(migration_sql)
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::MigrationError(format!("Migration {} failed: {}", name, e)))?;
            info!(migration = name, "Migration completed");
        }

        info!(count = MIGRATIONS.len(), "All migrations completed");
        Ok(())
    }
}
