// アプリケーションサービス
// ユースケースごとにドメインモデルとリポジトリを組み合わせる

mod inventory_controller;
mod ticket_lifecycle_service;

pub use inventory_controller::{
    InventoryControlConfig, InventoryController, StockAdjustment, StockOperation,
};
pub use ticket_lifecycle_service::TicketLifecycleService;
