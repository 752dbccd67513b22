use crate::domain::error::DomainError;
use crate::domain::model::TicketId;
use crate::domain::port::RepositoryError;
use std::time::Duration;
use thiserror::Error;

/// アプリケーション層のエラー型
/// 呼び出し側が「再試行してよいか」を区別できるよう、種類ごとに安定したコードを持つ
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// 参照されたチケットが存在しない
    #[error("Ticket not found: {0}")]
    NotFound(TicketId),
    /// 引数が不正（0以下の数量、負の価格など）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// 在庫不足（ビジネスルールによる拒否）
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u32 },
    /// 同時更新の競合が再試行上限まで解消しなかった
    #[error("Concurrent modification of ticket {ticket_id} after {attempts} attempts")]
    Conflict { ticket_id: TicketId, attempts: u32 },
    /// ストアに到達できない
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// 操作が設定されたタイムアウトを超えた
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    /// 上記以外のリポジトリエラー
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl ApplicationError {
    /// 呼び出し側向けの安定したエラーコード
    pub fn code(&self) -> &'static str {
        match self {
            ApplicationError::NotFound(_) => "TICKET_NOT_FOUND",
            ApplicationError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ApplicationError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            ApplicationError::Conflict { .. } => "CONCURRENT_MODIFICATION",
            ApplicationError::Unavailable(_) => "STORE_UNAVAILABLE",
            ApplicationError::Timeout(_) => "OPERATION_TIMEOUT",
            ApplicationError::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// 同じ要求を再試行すれば成功する可能性があるか
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::Conflict { .. }
                | ApplicationError::Unavailable(_)
                | ApplicationError::Timeout(_)
        )
    }
}

// From実装でエラー変換を簡潔に
impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InsufficientStock {
                requested,
                available,
            } => ApplicationError::InsufficientStock {
                requested,
                available,
            },
            other => ApplicationError::InvalidArgument(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConnectionFailed(msg) => ApplicationError::Unavailable(msg),
            other => ApplicationError::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_conversion() {
        let err = ApplicationError::from(DomainError::InvalidQuantity(0));
        assert!(matches!(err, ApplicationError::InvalidArgument(_)));

        let err = ApplicationError::from(DomainError::InsufficientStock {
            requested: 3,
            available: 1,
        });
        assert_eq!(
            err,
            ApplicationError::InsufficientStock {
                requested: 3,
                available: 1
            }
        );

        let err = ApplicationError::from(DomainError::StockOverflow {
            available: u32::MAX,
            refunded: 1,
        });
        assert_eq!(err.code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_connection_failure_maps_to_unavailable() {
        let err = ApplicationError::from(RepositoryError::ConnectionFailed("refused".to_string()));
        assert_eq!(err, ApplicationError::Unavailable("refused".to_string()));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_other_repository_failures_are_not_retryable() {
        let err = ApplicationError::from(RepositoryError::FetchFailed("bad row".to_string()));
        assert_eq!(err.code(), "REPOSITORY_ERROR");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retry_classification() {
        let ticket_id = TicketId::new(1);
        assert!(ApplicationError::Conflict { ticket_id, attempts: 5 }.is_retryable());
        assert!(ApplicationError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!ApplicationError::NotFound(ticket_id).is_retryable());
        assert!(!ApplicationError::InvalidArgument("x".to_string()).is_retryable());
        assert!(!ApplicationError::InsufficientStock {
            requested: 1,
            available: 0
        }
        .is_retryable());
    }

    #[test]
    fn test_codes_are_distinct() {
        let ticket_id = TicketId::new(1);
        let errors = [
            ApplicationError::NotFound(ticket_id),
            ApplicationError::InvalidArgument("x".to_string()),
            ApplicationError::InsufficientStock {
                requested: 1,
                available: 0,
            },
            ApplicationError::Conflict { ticket_id, attempts: 1 },
            ApplicationError::Unavailable("down".to_string()),
            ApplicationError::Timeout(Duration::from_millis(1)),
            ApplicationError::Repository(RepositoryError::OperationFailed("x".to_string())),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
