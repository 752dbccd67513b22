use crate::domain::model::{EventId, NewTicket, Price, Ticket, TicketId, Version, VersionedTicket};
use crate::domain::port::{ConditionalWrite, RepositoryError, TicketRepository};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    tickets: BTreeMap<TicketId, VersionedTicket>,
}

/// インメモリチケットリポジトリ
/// 開発・テスト用の実装。MySQL実装と同じ条件付き書き込みの契約を持つ
#[derive(Debug, Default)]
pub struct InMemoryTicketRepository {
    store: Mutex<Store>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn insert(&self, ticket: &NewTicket) -> Result<TicketId, RepositoryError> {
        let mut store = self.store.lock().await;
        store.last_id += 1;
        let ticket_id = TicketId::new(store.last_id);

        store.tickets.insert(
            ticket_id,
            VersionedTicket {
                ticket: ticket.clone().into_ticket(ticket_id),
                version: Version::INITIAL,
            },
        );
        Ok(ticket_id)
    }

    async fn find_by_id(
        &self,
        ticket_id: TicketId,
    ) -> Result<Option<VersionedTicket>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.tickets.get(&ticket_id).cloned())
    }

    async fn find_by_event_id(&self, event_id: EventId) -> Result<Vec<Ticket>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store
            .tickets
            .values()
            .filter(|versioned| versioned.ticket.event_id() == event_id)
            .map(|versioned| versioned.ticket.clone())
            .collect())
    }

    async fn update_stock_if_version(
        &self,
        ticket: &Ticket,
        expected_version: Version,
    ) -> Result<ConditionalWrite, RepositoryError> {
        let mut store = self.store.lock().await;
        let Some(stored) = store.tickets.get_mut(&ticket.id()) else {
            return Ok(ConditionalWrite::VersionMismatch);
        };
        if stored.version != expected_version {
            return Ok(ConditionalWrite::VersionMismatch);
        }

        // 在庫数以外の項目は保存されている値を保つ
        stored.ticket = Ticket::reconstruct(
            stored.ticket.id(),
            stored.ticket.price(),
            stored.ticket.ticket_type().to_string(),
            ticket.quantity_available(),
            stored.ticket.event_id(),
        );
        stored.version = expected_version.next();
        Ok(ConditionalWrite::Applied(stored.version))
    }

    async fn update_details(
        &self,
        ticket_id: TicketId,
        price: Price,
        ticket_type: &str,
    ) -> Result<bool, RepositoryError> {
        let mut store = self.store.lock().await;
        let Some(stored) = store.tickets.get_mut(&ticket_id) else {
            return Ok(false);
        };

        stored.ticket = Ticket::reconstruct(
            ticket_id,
            price,
            ticket_type.to_string(),
            stored.ticket.quantity_available(),
            stored.ticket.event_id(),
        );
        Ok(true)
    }

    async fn delete(&self, ticket_id: TicketId) -> Result<bool, RepositoryError> {
        let mut store = self.store.lock().await;
        Ok(store.tickets.remove(&ticket_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repository_with_ticket(quantity: i64) -> (InMemoryTicketRepository, TicketId) {
        let repository = InMemoryTicketRepository::new();
        let new_ticket = NewTicket::new(1200, "Regular".to_string(), quantity, EventId::new(1)).unwrap();
        let ticket_id = repository.insert(&new_ticket).await.unwrap();
        (repository, ticket_id)
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repository = InMemoryTicketRepository::new();
        let new_ticket = NewTicket::new(100, "VIP".to_string(), 1, EventId::new(1)).unwrap();

        let first = repository.insert(&new_ticket).await.unwrap();
        let second = repository.insert(&new_ticket).await.unwrap();

        assert_eq!(first, TicketId::new(1));
        assert_eq!(second, TicketId::new(2));
    }

    #[tokio::test]
    async fn test_conditional_write_applies_on_matching_version() {
        let (repository, ticket_id) = repository_with_ticket(10).await;
        let VersionedTicket { mut ticket, version } =
            repository.find_by_id(ticket_id).await.unwrap().unwrap();

        ticket.sell(crate::domain::model::Quantity::new(4).unwrap()).unwrap();
        let outcome = repository.update_stock_if_version(&ticket, version).await.unwrap();

        assert_eq!(outcome, ConditionalWrite::Applied(Version::new(1)));
        let stored = repository.find_by_id(ticket_id).await.unwrap().unwrap();
        assert_eq!(stored.ticket.quantity_available(), 6);
        assert_eq!(stored.version, Version::new(1));
    }

    #[tokio::test]
    async fn test_conditional_write_rejects_stale_version() {
        let (repository, ticket_id) = repository_with_ticket(10).await;
        let VersionedTicket { ticket, version } =
            repository.find_by_id(ticket_id).await.unwrap().unwrap();

        // 先に別の書き込みが成功した状態を作る
        repository.update_stock_if_version(&ticket, version).await.unwrap();

        let stale = repository.update_stock_if_version(&ticket, version).await.unwrap();
        assert_eq!(stale, ConditionalWrite::VersionMismatch);
    }

    #[tokio::test]
    async fn test_conditional_write_on_deleted_ticket_is_mismatch() {
        let (repository, ticket_id) = repository_with_ticket(10).await;
        let VersionedTicket { ticket, version } =
            repository.find_by_id(ticket_id).await.unwrap().unwrap();

        assert!(repository.delete(ticket_id).await.unwrap());

        let outcome = repository.update_stock_if_version(&ticket, version).await.unwrap();
        assert_eq!(outcome, ConditionalWrite::VersionMismatch);
        assert!(repository.find_by_id(ticket_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_conditional_write_keeps_concurrent_detail_update() {
        let (repository, ticket_id) = repository_with_ticket(10).await;
        let VersionedTicket { mut ticket, version } =
            repository.find_by_id(ticket_id).await.unwrap().unwrap();

        repository
            .update_details(ticket_id, Price::new(9900).unwrap(), "VIP")
            .await
            .unwrap();

        ticket.sell(crate::domain::model::Quantity::new(1).unwrap()).unwrap();
        let outcome = repository.update_stock_if_version(&ticket, version).await.unwrap();
        assert_eq!(outcome, ConditionalWrite::Applied(Version::new(1)));

        let stored = repository.find_by_id(ticket_id).await.unwrap().unwrap();
        assert_eq!(stored.ticket.price().amount(), 9900);
        assert_eq!(stored.ticket.ticket_type(), "VIP");
        assert_eq!(stored.ticket.quantity_available(), 9);
    }

    #[tokio::test]
    async fn test_delete_missing_ticket_returns_false() {
        let repository = InMemoryTicketRepository::new();
        assert!(!repository.delete(TicketId::new(1)).await.unwrap());
    }
}
