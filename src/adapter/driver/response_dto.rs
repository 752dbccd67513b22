use crate::application::service::StockAdjustment;
use crate::domain::model::Ticket;
use serde::{Deserialize, Serialize};

/// チケット作成結果のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTicketResponse {
    pub ticket_id: i64,
}

/// チケット用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct TicketResponse {
    pub ticket_id: i64,
    pub price: i64,
    pub ticket_type: String,
    pub quantity_available: u32,
    pub event_id: i64,
}

/// 販売・払い戻し結果のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct StockAdjustmentResponse {
    pub ticket_id: i64,
    pub quantity_available: u32,
    pub version: u64,
}

impl TicketResponse {
    /// ドメインオブジェクトからTicketResponseを作成
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            ticket_id: ticket.id().value(),
            price: ticket.price().amount(),
            ticket_type: ticket.ticket_type().to_string(),
            quantity_available: ticket.quantity_available(),
            event_id: ticket.event_id().value(),
        }
    }
}

impl StockAdjustmentResponse {
    pub fn from_adjustment(adjustment: &StockAdjustment) -> Self {
        Self {
            ticket_id: adjustment.ticket_id.value(),
            quantity_available: adjustment.quantity_available,
            version: adjustment.version.value(),
        }
    }
}
