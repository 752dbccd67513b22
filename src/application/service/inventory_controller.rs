use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{Quantity, Ticket, TicketId, Version, VersionedTicket};
use crate::domain::port::{ConditionalWrite, TicketRepository};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// 在庫制御の設定
#[derive(Debug, Clone)]
pub struct InventoryControlConfig {
    /// 1回の操作で条件付き書き込みを試みる最大回数（1以上）
    pub max_attempts: u32,
    /// 競合時の待機時間の基準値（試行回数に比例して伸ばす）
    pub retry_delay: Duration,
    /// 1回の操作の期限（読み取りと再試行待機に適用。発行済みの書き込みは打ち切らない）
    pub operation_timeout: Duration,
}

impl Default for InventoryControlConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_millis(10),
            operation_timeout: Duration::from_secs(5),
        }
    }
}

/// 在庫を変更する操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOperation {
    Sell,
    Refund,
}

impl StockOperation {
    fn apply_to(self, ticket: &mut Ticket, quantity: Quantity) -> Result<(), DomainError> {
        match self {
            StockOperation::Sell => ticket.sell(quantity),
            StockOperation::Refund => ticket.refund(quantity),
        }
    }
}

impl fmt::Display for StockOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockOperation::Sell => write!(f, "sell"),
            StockOperation::Refund => write!(f, "refund"),
        }
    }
}

/// 成功した在庫変更の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    pub ticket_id: TicketId,
    /// 書き込み後の残り在庫数
    pub quantity_available: u32,
    /// 書き込み後のバージョン
    pub version: Version,
    /// 書き込みに要した試行回数
    pub attempts: u32,
}

/// 在庫コントローラー
/// 販売・払い戻しを「読み取り → 検証 → 条件付き書き込み」の1サイクルとして実行し、
/// 同時実行下でも在庫数が負にならないことを保証する。
/// 排他制御はストアの条件付き書き込みのみに依存し、ロックやキャッシュは持たない
pub struct InventoryController {
    ticket_repository: Arc<dyn TicketRepository>,
    config: InventoryControlConfig,
}

impl InventoryController {
    /// 新しい在庫コントローラーを作成
    ///
    /// # Arguments
    /// * `ticket_repository` - チケットリポジトリ
    /// * `config` - 再試行とタイムアウトの設定
    pub fn new(ticket_repository: Arc<dyn TicketRepository>, config: InventoryControlConfig) -> Self {
        Self {
            ticket_repository,
            config,
        }
    }

    pub fn config(&self) -> &InventoryControlConfig {
        &self.config
    }

    /// チケットを販売する（在庫を減算）
    ///
    /// # Arguments
    /// * `ticket_id` - チケットID
    /// * `quantity` - 販売数（1以上）
    ///
    /// # Returns
    /// * `Ok(StockAdjustment)` - 販売成功
    /// * `Err(ApplicationError::InvalidArgument)` - 数量が0以下
    /// * `Err(ApplicationError::NotFound)` - チケットが存在しない
    /// * `Err(ApplicationError::InsufficientStock)` - 在庫不足
    /// * `Err(ApplicationError::Conflict)` - 競合が再試行上限まで続いた
    /// * `Err(ApplicationError::Unavailable)` / `Err(ApplicationError::Timeout)` - ストア障害
    pub async fn sell(
        &self,
        ticket_id: TicketId,
        quantity: i64,
    ) -> Result<StockAdjustment, ApplicationError> {
        self.adjust_stock(StockOperation::Sell, ticket_id, quantity)
            .await
    }

    /// チケットを払い戻す（在庫を加算）
    /// 初期在庫数を上限としたチェックは行わない
    ///
    /// # Arguments
    /// * `ticket_id` - チケットID
    /// * `quantity` - 払い戻し数（1以上）
    pub async fn refund(
        &self,
        ticket_id: TicketId,
        quantity: i64,
    ) -> Result<StockAdjustment, ApplicationError> {
        self.adjust_stock(StockOperation::Refund, ticket_id, quantity)
            .await
    }

    async fn adjust_stock(
        &self,
        operation: StockOperation,
        ticket_id: TicketId,
        quantity: i64,
    ) -> Result<StockAdjustment, ApplicationError> {
        let quantity = Quantity::new(quantity)?;

        let operation_id = Uuid::new_v4();
        let span = info_span!(
            "stock_adjustment",
            %operation_id,
            %ticket_id,
            %operation,
            quantity = quantity.value(),
        );

        async move {
            match self.read_validate_write(operation, ticket_id, quantity).await {
                Ok(adjustment) => {
                    info!(
                        quantity_available = adjustment.quantity_available,
                        version = %adjustment.version,
                        attempts = adjustment.attempts,
                        "Stock adjusted"
                    );
                    Ok(adjustment)
                }
                Err(err) => {
                    log_failure(&err);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// 読み取り → 検証 → 条件付き書き込みを、競合がなくなるか上限に達するまで繰り返す
    ///
    /// 期限は読み取りと再試行前の待機にのみ適用する。
    /// 発行済みの書き込みは打ち切らずに結果を待つ
    async fn read_validate_write(
        &self,
        operation: StockOperation,
        ticket_id: TicketId,
        quantity: Quantity,
    ) -> Result<StockAdjustment, ApplicationError> {
        let timeout = self.config.operation_timeout;
        let deadline = Instant::now() + timeout;
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let VersionedTicket {
                mut ticket,
                version,
            } = timeout_at(deadline, self.ticket_repository.find_by_id(ticket_id))
                .await
                .map_err(|_| ApplicationError::Timeout(timeout))??
                .ok_or(ApplicationError::NotFound(ticket_id))?;

            operation.apply_to(&mut ticket, quantity)?;

            match self
                .ticket_repository
                .update_stock_if_version(&ticket, version)
                .await?
            {
                ConditionalWrite::Applied(new_version) => {
                    return Ok(StockAdjustment {
                        ticket_id,
                        quantity_available: ticket.quantity_available(),
                        version: new_version,
                        attempts: attempt,
                    });
                }
                ConditionalWrite::VersionMismatch if attempt < max_attempts => {
                    debug!(attempt, expected_version = %version, "Version conflict, retrying");
                    let backoff = self.config.retry_delay.saturating_mul(attempt);
                    timeout_at(deadline, tokio::time::sleep(backoff))
                        .await
                        .map_err(|_| ApplicationError::Timeout(timeout))?;
                }
                ConditionalWrite::VersionMismatch => {
                    return Err(ApplicationError::Conflict {
                        ticket_id,
                        attempts: attempt,
                    });
                }
            }
        }
    }
}

fn log_failure(err: &ApplicationError) {
    match err {
        ApplicationError::NotFound(_)
        | ApplicationError::InvalidArgument(_)
        | ApplicationError::InsufficientStock { .. } => {
            info!(code = err.code(), "Stock adjustment rejected: {}", err)
        }
        ApplicationError::Conflict { .. } | ApplicationError::Timeout(_) => {
            warn!(code = err.code(), "Stock adjustment gave up: {}", err)
        }
        ApplicationError::Unavailable(_) | ApplicationError::Repository(_) => {
            error!(code = err.code(), "Stock adjustment failed: {}", err)
        }
    }
}
