// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod ticket;

pub use value_objects::{EventId, Price, Quantity, TicketId, Version};

pub use ticket::{validate_ticket_type, NewTicket, Ticket, VersionedTicket};
