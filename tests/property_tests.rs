use event_ticket_inventory::adapter::driven::InMemoryTicketRepository;
use event_ticket_inventory::application::service::{InventoryControlConfig, InventoryController};
use event_ticket_inventory::application::ApplicationError;
use event_ticket_inventory::domain::error::DomainError;
use event_ticket_inventory::domain::model::{
    EventId, NewTicket, Price, Quantity, Ticket, TicketId, Version,
};
use event_ticket_inventory::domain::port::TicketRepository;
use proptest::prelude::*;
use std::sync::Arc;

fn ticket_with_stock(quantity_available: u32) -> Ticket {
    Ticket::reconstruct(
        TicketId::new(1),
        Price::new(1000).unwrap(),
        "Regular".to_string(),
        quantity_available,
        EventId::new(1),
    )
}

// 在庫操作の列（true: 販売, false: 払い戻し）
fn stock_operations() -> impl Strategy<Value = Vec<(bool, u32)>> {
    prop::collection::vec((any::<bool>(), 1u32..20), 0..40)
}

// Quantity のプロパティベーステスト
proptest! {
    /// 0以下の数量は常に拒否される
    #[test]
    fn test_quantity_rejects_non_positive(value in i64::MIN..=0) {
        prop_assert_eq!(Quantity::new(value), Err(DomainError::InvalidQuantity(value)));
    }

    /// 正の数量は大きさに関係なく受け入れられる
    #[test]
    fn test_quantity_accepts_positive(value in 1i64..=i64::MAX) {
        let quantity = Quantity::new(value).unwrap();
        prop_assert_eq!(quantity.value() as i64, value);
    }

    /// 負の価格は拒否され、0以上は受け入れられる
    #[test]
    fn test_price_sign_validation(amount in -1_000_000i64..1_000_000) {
        prop_assert_eq!(Price::new(amount).is_ok(), amount >= 0);
    }

    /// バージョンは常に1ずつ進む
    #[test]
    fn test_version_next_is_monotonic(value in 0u64..u64::MAX) {
        prop_assert_eq!(Version::new(value).next().value(), value + 1);
    }
}

// Ticket 集約のプロパティベーステスト
proptest! {
    /// 販売と払い戻しは可逆
    #[test]
    fn test_ticket_sell_refund_reversible(
        initial in 1u32..10_000,
        requested in 1u32..10_000,
    ) {
        prop_assume!(requested <= initial);
        let mut ticket = ticket_with_stock(initial);
        let quantity = Quantity::new(requested as i64).unwrap();

        ticket.sell(quantity).unwrap();
        ticket.refund(quantity).unwrap();

        prop_assert_eq!(ticket.quantity_available(), initial);
    }

    /// 在庫を超える販売は失敗し、在庫は変更されない
    #[test]
    fn test_ticket_oversell_leaves_stock_unchanged(
        initial in 0u32..1_000,
        excess in 1u32..1_000,
    ) {
        let mut ticket = ticket_with_stock(initial);
        let result = ticket.sell(Quantity::new((initial + excess) as i64).unwrap());

        prop_assert_eq!(
            result,
            Err(DomainError::InsufficientStock { requested: (initial + excess) as u64, available: initial })
        );
        prop_assert_eq!(ticket.quantity_available(), initial);
    }

    /// 任意の操作列の後、在庫数 = 初期在庫 - 成功した販売 + 成功した払い戻し
    #[test]
    fn test_ticket_stock_accounting(
        initial in 0u32..100,
        operations in stock_operations(),
    ) {
        let mut ticket = ticket_with_stock(initial);
        let mut sold: i64 = 0;
        let mut refunded: i64 = 0;

        for (is_sell, amount) in operations {
            let quantity = Quantity::new(amount as i64).unwrap();
            if is_sell {
                let before = ticket.quantity_available();
                match ticket.sell(quantity) {
                    Ok(()) => sold += amount as i64,
                    Err(_) => prop_assert!(amount > before),
                }
            } else {
                ticket.refund(quantity).unwrap();
                refunded += amount as i64;
            }
        }

        prop_assert_eq!(ticket.quantity_available() as i64, initial as i64 - sold + refunded);
    }

    /// has_available_stock は在庫数との比較と一致する
    #[test]
    fn test_ticket_has_available_stock_accuracy(
        initial in 0u32..1_000,
        requested in 1u32..2_000,
    ) {
        let ticket = ticket_with_stock(initial);
        let quantity = Quantity::new(requested as i64).unwrap();
        prop_assert_eq!(ticket.has_available_stock(quantity), requested <= initial);
    }
}

// InventoryController のプロパティベーステスト
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// コントローラー経由でも在庫の会計が保たれ、各書き込みでバージョンが1つ進む
    #[test]
    fn test_controller_stock_accounting(
        initial in 0i64..100,
        operations in stock_operations(),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let repository = Arc::new(InMemoryTicketRepository::new());
            let ticket_id = repository
                .insert(&NewTicket::new(500, "Regular".to_string(), initial, EventId::new(1)).unwrap())
                .await
                .unwrap();
            let controller =
                InventoryController::new(repository.clone(), InventoryControlConfig::default());

            let mut expected = initial;
            let mut writes: u64 = 0;

            for (is_sell, amount) in operations {
                let result = if is_sell {
                    controller.sell(ticket_id, amount as i64).await
                } else {
                    controller.refund(ticket_id, amount as i64).await
                };

                match result {
                    Ok(adjustment) => {
                        expected += if is_sell { -(amount as i64) } else { amount as i64 };
                        writes += 1;
                        prop_assert_eq!(adjustment.quantity_available as i64, expected);
                        prop_assert_eq!(adjustment.version, Version::new(writes));
                    }
                    Err(ApplicationError::InsufficientStock { requested, available }) => {
                        prop_assert!(is_sell);
                        prop_assert_eq!(requested, amount as u64);
                        prop_assert_eq!(available as i64, expected);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
                }
            }

            let stored = repository.find_by_id(ticket_id).await.unwrap().unwrap();
            prop_assert_eq!(stored.ticket.quantity_available() as i64, expected);
            prop_assert_eq!(stored.version, Version::new(writes));
            Ok::<(), TestCaseError>(())
        })?;
    }
}
