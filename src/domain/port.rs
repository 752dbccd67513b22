// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{EventId, NewTicket, Price, Ticket, TicketId, Version, VersionedTicket};
use async_trait::async_trait;
use thiserror::Error;

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// ストアに接続できない（接続拒否、プール取得のタイムアウトなど）
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// 操作に失敗
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    /// データの取得に失敗
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}

/// 条件付き書き込みの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalWrite {
    /// 書き込み成功。新しいバージョンを返す
    Applied(Version),
    /// 読み取り後に別の書き込みが行われた（またはレコードが削除された）
    VersionMismatch,
}

/// チケットリポジトリトレイト
/// チケットの永続化と、在庫カウンタの条件付き更新を抽象化する
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// 新しいチケットを保存し、採番されたIDを返す
    /// 初期バージョンは `Version::INITIAL`
    async fn insert(&self, ticket: &NewTicket) -> Result<TicketId, RepositoryError>;

    /// チケットIDでチケットとバージョントークンを検索する
    ///
    /// # Returns
    /// * `Ok(Some(VersionedTicket))` - チケットが見つかった
    /// * `Ok(None)` - チケットが見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(&self, ticket_id: TicketId)
        -> Result<Option<VersionedTicket>, RepositoryError>;

    /// イベントに所属するチケットをID昇順で取得する
    async fn find_by_event_id(&self, event_id: EventId) -> Result<Vec<Ticket>, RepositoryError>;

    /// 在庫数を条件付きで書き込む
    /// 保存されているバージョンが `expected_version` と一致する場合のみ
    /// `quantity_available` を上書きし、バージョンを1つ進める
    ///
    /// # Arguments
    /// * `ticket` - 新しい在庫数を持つチケット
    /// * `expected_version` - 読み取り時のバージョン
    ///
    /// # Returns
    /// * `Ok(ConditionalWrite::Applied(version))` - 書き込み成功
    /// * `Ok(ConditionalWrite::VersionMismatch)` - 競合。何も書き込まれていない
    /// * `Err(RepositoryError)` - 書き込み失敗。何も書き込まれていない
    async fn update_stock_if_version(
        &self,
        ticket: &Ticket,
        expected_version: Version,
    ) -> Result<ConditionalWrite, RepositoryError>;

    /// 価格とチケット種別のみを上書きする
    /// 在庫数とバージョンには触れない
    ///
    /// # Returns
    /// * `Ok(true)` - 更新成功
    /// * `Ok(false)` - チケットが存在しない
    async fn update_details(
        &self,
        ticket_id: TicketId,
        price: Price,
        ticket_type: &str,
    ) -> Result<bool, RepositoryError>;

    /// チケットを削除する
    ///
    /// # Returns
    /// * `Ok(true)` - 削除成功
    /// * `Ok(false)` - チケットが存在しない
    async fn delete(&self, ticket_id: TicketId) -> Result<bool, RepositoryError>;
}
