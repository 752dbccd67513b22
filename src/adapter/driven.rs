// 駆動される側アダプター（リポジトリ実装など）

mod mysql_ticket_repository;
mod in_memory_ticket_repository;

pub use mysql_ticket_repository::MySqlTicketRepository;
pub use in_memory_ticket_repository::InMemoryTicketRepository;
