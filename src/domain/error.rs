use thiserror::Error;

/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 無効な数量（0以下）
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),
    /// 無効な価格（負の金額）
    #[error("Invalid price: {0}")]
    InvalidPrice(i64),
    /// 無効なチケット種別（空文字列など）
    #[error("Invalid ticket type: {0:?}")]
    InvalidTicketType(String),
    /// 在庫不足
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u32 },
    /// 払い戻しによって在庫カウンタが上限を超える
    #[error("Stock overflow: {available} + {refunded} exceeds the counter range")]
    StockOverflow { available: u32, refunded: u64 },
}
