use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{EventId, NewTicket, Price, Ticket, TicketId, Version, VersionedTicket};
use crate::domain::port::{ConditionalWrite, RepositoryError, TicketRepository};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool, Row};

const SELECT_COLUMNS: &str =
    "SELECT id, price, ticket_type, quantity_available, event_id, version FROM tickets";

/// MySQLチケットリポジトリ
/// MySQLデータベースを使用してチケットを永続化する。
/// 各メソッドはプールから接続を1つ取得し、1文を実行して返却する
#[derive(Clone)]
pub struct MySqlTicketRepository {
    pool: Pool<MySql>,
}

impl MySqlTicketRepository {
    /// 新しいMySQLチケットリポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行からバージョン付きチケットを再構築する
    fn versioned_ticket_from_row(row: &MySqlRow) -> Result<VersionedTicket, RepositoryError> {
        let fetch_err =
            |e: sqlx::Error| RepositoryError::FetchFailed(format!("チケット行の解析に失敗しました: {}", e));

        let price = Price::new(row.try_get::<i64, _>("price").map_err(fetch_err)?).map_err(|e| {
            RepositoryError::FetchFailed(format!("価格の構築に失敗しました: {}", e))
        })?;

        let ticket = Ticket::reconstruct(
            TicketId::new(row.try_get::<i64, _>("id").map_err(fetch_err)?),
            price,
            row.try_get::<String, _>("ticket_type").map_err(fetch_err)?,
            row.try_get::<u32, _>("quantity_available").map_err(fetch_err)?,
            EventId::new(row.try_get::<i64, _>("event_id").map_err(fetch_err)?),
        );
        let version = Version::new(row.try_get::<u64, _>("version").map_err(fetch_err)?);

        Ok(VersionedTicket { ticket, version })
    }

    async fn exists(&self, ticket_id: TicketId) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM tickets WHERE id = ?")
            .bind(ticket_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("チケットの存在確認に失敗しました", e))?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl TicketRepository for MySqlTicketRepository {
    async fn insert(&self, ticket: &NewTicket) -> Result<TicketId, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO tickets (price, ticket_type, quantity_available, event_id, version)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(ticket.price().amount())
        .bind(ticket.ticket_type())
        .bind(ticket.initial_quantity())
        .bind(ticket.event_id().value())
        .bind(Version::INITIAL.value())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx("チケットの保存に失敗しました", e))?;

        let id = i64::try_from(result.last_insert_id()).map_err(|e| {
            RepositoryError::OperationFailed(format!("採番されたIDが範囲外です: {}", e))
        })?;
        Ok(TicketId::new(id))
    }

    async fn find_by_id(
        &self,
        ticket_id: TicketId,
    ) -> Result<Option<VersionedTicket>, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(ticket_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("チケットの取得に失敗しました", e))?;

        row.as_ref()
            .map(Self::versioned_ticket_from_row)
            .transpose()
    }

    async fn find_by_event_id(&self, event_id: EventId) -> Result<Vec<Ticket>, RepositoryError> {
        // チケットIDの昇順で並べる
        let rows = sqlx::query(&format!("{} WHERE event_id = ? ORDER BY id ASC", SELECT_COLUMNS))
            .bind(event_id.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("チケット一覧の取得に失敗しました", e))?;

        rows.iter()
            .map(|row| Self::versioned_ticket_from_row(row).map(|versioned| versioned.ticket))
            .collect()
    }

    async fn update_stock_if_version(
        &self,
        ticket: &Ticket,
        expected_version: Version,
    ) -> Result<ConditionalWrite, RepositoryError> {
        // versionは必ず変わるため、MySQLの「変更された行数」でも一致判定になる
        let result = sqlx::query(
            r#"
            UPDATE tickets
            SET quantity_available = ?, version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(ticket.quantity_available())
        .bind(ticket.id().value())
        .bind(expected_version.value())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx("在庫の更新に失敗しました", e))?;

        if result.rows_affected() == 1 {
            Ok(ConditionalWrite::Applied(expected_version.next()))
        } else {
            Ok(ConditionalWrite::VersionMismatch)
        }
    }

    async fn update_details(
        &self,
        ticket_id: TicketId,
        price: Price,
        ticket_type: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE tickets SET price = ?, ticket_type = ? WHERE id = ?")
            .bind(price.amount())
            .bind(ticket_type)
            .bind(ticket_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("チケット詳細の更新に失敗しました", e))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // 同じ値での更新は変更行数0になるため、存在確認で区別する
        self.exists(ticket_id).await
    }

    async fn delete(&self, ticket_id: TicketId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = ?")
            .bind(ticket_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("チケットの削除に失敗しました", e))?;

        Ok(result.rows_affected() > 0)
    }
}
