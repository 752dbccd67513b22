use crate::application::ApplicationError;
use crate::domain::model::{validate_ticket_type, EventId, NewTicket, Price, Ticket, TicketId};
use crate::domain::port::TicketRepository;
use std::sync::Arc;
use tracing::info;

/// チケットライフサイクルサービス
/// チケットの作成・取得・一覧・詳細更新・削除を担当する。
/// 在庫数は作成時の初期値の設定のみ行い、以降の変更は在庫コントローラーに任せる
pub struct TicketLifecycleService {
    ticket_repository: Arc<dyn TicketRepository>,
}

impl TicketLifecycleService {
    /// 新しいチケットライフサイクルサービスを作成
    ///
    /// # Arguments
    /// * `ticket_repository` - チケットリポジトリ
    pub fn new(ticket_repository: Arc<dyn TicketRepository>) -> Self {
        Self { ticket_repository }
    }

    /// 新しいチケットを作成
    ///
    /// # Arguments
    /// * `price` - 価格（通貨の最小単位、0以上）
    /// * `ticket_type` - チケット種別
    /// * `initial_quantity` - 初期在庫数（0以上）
    /// * `event_id` - 所属イベントID
    ///
    /// # Returns
    /// * `Ok(TicketId)` - 作成されたチケットのID
    /// * `Err(ApplicationError::InvalidArgument)` - 入力値が不正
    pub async fn create_ticket(
        &self,
        price: i64,
        ticket_type: String,
        initial_quantity: i64,
        event_id: EventId,
    ) -> Result<TicketId, ApplicationError> {
        let new_ticket = NewTicket::new(price, ticket_type, initial_quantity, event_id)?;
        let ticket_id = self.ticket_repository.insert(&new_ticket).await?;

        info!(
            %ticket_id,
            %event_id,
            initial_quantity = new_ticket.initial_quantity(),
            "Ticket created"
        );
        Ok(ticket_id)
    }

    /// チケットIDでチケットを取得
    ///
    /// # Returns
    /// * `Ok(Ticket)` - チケットが見つかった
    /// * `Err(ApplicationError::NotFound)` - チケットが存在しない
    pub async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket, ApplicationError> {
        self.ticket_repository
            .find_by_id(ticket_id)
            .await?
            .map(|versioned| versioned.ticket)
            .ok_or(ApplicationError::NotFound(ticket_id))
    }

    /// イベントに所属するチケットをID昇順で取得
    pub async fn list_tickets_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Ticket>, ApplicationError> {
        self.ticket_repository
            .find_by_event_id(event_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 価格とチケット種別を更新
    /// 在庫数には触れないため、販売・払い戻しと競合しない
    ///
    /// # Returns
    /// * `Ok(())` - 更新成功
    /// * `Err(ApplicationError::NotFound)` - チケットが存在しない
    /// * `Err(ApplicationError::InvalidArgument)` - 入力値が不正
    pub async fn update_ticket_details(
        &self,
        ticket_id: TicketId,
        price: i64,
        ticket_type: String,
    ) -> Result<(), ApplicationError> {
        let price = Price::new(price)?;
        let ticket_type = validate_ticket_type(ticket_type)?;

        let updated = self
            .ticket_repository
            .update_details(ticket_id, price, &ticket_type)
            .await?;
        if !updated {
            return Err(ApplicationError::NotFound(ticket_id));
        }

        info!(%ticket_id, price = price.amount(), %ticket_type, "Ticket details updated");
        Ok(())
    }

    /// チケットを削除
    /// 残り在庫数はチェックしない
    ///
    /// # Returns
    /// * `Ok(())` - 削除成功
    /// * `Err(ApplicationError::NotFound)` - チケットが存在しない
    pub async fn delete_ticket(&self, ticket_id: TicketId) -> Result<(), ApplicationError> {
        let deleted = self.ticket_repository.delete(ticket_id).await?;
        if !deleted {
            return Err(ApplicationError::NotFound(ticket_id));
        }

        info!(%ticket_id, "Ticket deleted");
        Ok(())
    }
}
