use serde::{Deserialize, Serialize};

/// チケット作成用のリクエストDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub price: i64, // 通貨の最小単位
    pub ticket_type: String,
    pub quantity_available: i64,
    pub event_id: i64,
}

/// チケット詳細更新用のリクエストDTO
/// 在庫数はここでは変更できない
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTicketRequest {
    pub price: i64,
    pub ticket_type: String,
}

/// 販売・払い戻し用のリクエストDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct StockAdjustmentRequest {
    pub quantity: i64,
}
