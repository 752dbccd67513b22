use crate::domain::error::DomainError;
use crate::domain::model::{EventId, Price, Quantity, TicketId, Version};

/// チケット集約
/// イベントで販売されるチケット種別と、その残り在庫数を管理する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: TicketId,
    price: Price,
    ticket_type: String,
    quantity_available: u32,
    event_id: EventId,
}

impl Ticket {
    /// ストアから取得したデータでチケットを再構築
    ///
    /// # Arguments
    /// * `id` - チケットID
    /// * `price` - 価格
    /// * `ticket_type` - チケット種別
    /// * `quantity_available` - 残り在庫数
    /// * `event_id` - 所属イベントID
    pub fn reconstruct(
        id: TicketId,
        price: Price,
        ticket_type: String,
        quantity_available: u32,
        event_id: EventId,
    ) -> Self {
        Self {
            id,
            price,
            ticket_type,
            quantity_available,
            event_id,
        }
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn ticket_type(&self) -> &str {
        &self.ticket_type
    }

    /// 残り在庫数を取得
    pub fn quantity_available(&self) -> u32 {
        self.quantity_available
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// 在庫を販売する
    ///
    /// # Returns
    /// * `Ok(())` - 販売成功（在庫を減算済み）
    /// * `Err(DomainError::InsufficientStock)` - 在庫不足。在庫は変更されない
    pub fn sell(&mut self, quantity: Quantity) -> Result<(), DomainError> {
        let sold = u32::try_from(quantity.value())
            .ok()
            .filter(|&sold| sold <= self.quantity_available)
            .ok_or(DomainError::InsufficientStock {
                requested: quantity.value(),
                available: self.quantity_available,
            })?;
        self.quantity_available -= sold;
        Ok(())
    }

    /// 在庫を払い戻す
    /// 初期在庫数を上限としたチェックは行わない
    ///
    /// # Returns
    /// * `Ok(())` - 払い戻し成功
    /// * `Err(DomainError::StockOverflow)` - 在庫カウンタが上限を超える
    pub fn refund(&mut self, quantity: Quantity) -> Result<(), DomainError> {
        self.quantity_available = u32::try_from(quantity.value())
            .ok()
            .and_then(|refunded| self.quantity_available.checked_add(refunded))
            .ok_or(DomainError::StockOverflow {
                available: self.quantity_available,
                refunded: quantity.value(),
            })?;
        Ok(())
    }

    /// 指定された数量の在庫が利用可能かチェック
    pub fn has_available_stock(&self, quantity: Quantity) -> bool {
        u64::from(self.quantity_available) >= quantity.value()
    }
}

/// バージョントークン付きのチケット
/// ストアからの読み取り結果で、条件付き書き込みの前提条件として使う
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedTicket {
    pub ticket: Ticket,
    pub version: Version,
}

/// 新規作成するチケット
/// IDはストアが採番するため持たない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    price: Price,
    ticket_type: String,
    initial_quantity: u32,
    event_id: EventId,
}

impl NewTicket {
    /// 新規チケットを検証して作成
    ///
    /// # Arguments
    /// * `price` - 価格（0以上）
    /// * `ticket_type` - チケット種別（空白のみは不可）
    /// * `initial_quantity` - 初期在庫数（0以上）
    /// * `event_id` - 所属イベントID
    pub fn new(
        price: i64,
        ticket_type: String,
        initial_quantity: i64,
        event_id: EventId,
    ) -> Result<Self, DomainError> {
        let price = Price::new(price)?;
        let ticket_type = validate_ticket_type(ticket_type)?;
        let initial_quantity = u32::try_from(initial_quantity)
            .map_err(|_| DomainError::InvalidQuantity(initial_quantity))?;

        Ok(Self {
            price,
            ticket_type,
            initial_quantity,
            event_id,
        })
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn ticket_type(&self) -> &str {
        &self.ticket_type
    }

    pub fn initial_quantity(&self) -> u32 {
        self.initial_quantity
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// 採番されたIDでチケット集約に変換
    pub fn into_ticket(self, id: TicketId) -> Ticket {
        Ticket::reconstruct(
            id,
            self.price,
            self.ticket_type,
            self.initial_quantity,
            self.event_id,
        )
    }
}

/// チケット種別を検証する（前後の空白は取り除く）
pub fn validate_ticket_type(ticket_type: String) -> Result<String, DomainError> {
    let trimmed = ticket_type.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidTicketType(ticket_type));
    }
    Ok(trimmed.to_string())
}
