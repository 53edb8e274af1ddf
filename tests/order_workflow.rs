//! Cart-to-order workflow tests, run against the in-memory store in
//! `common`, which honors the same contracts as the diesel stores.

mod common;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use bookstore_service::application::order_service::OrderService;
use bookstore_service::domain::errors::DomainError;
use bookstore_service::domain::order::{NewOrder, OrderStatus};
use bookstore_service::domain::ports::{CartStore, OrderStore};

use common::MemStore;

fn service(store: &MemStore) -> OrderService<MemStore, MemStore> {
    OrderService::new(store.clone(), store.clone())
}

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

/// A user with a cart holding {book_a qty 2 @ 10.00, book_b qty 1 @ 5.50}.
fn user_with_stocked_cart(store: &MemStore) -> (Uuid, Uuid, Uuid) {
    let user_id = Uuid::new_v4();
    store.create_cart(user_id);
    let book_a = store.stock_book("10.00");
    let book_b = store.stock_book("5.50");
    store.add_book(user_id, book_a, 2).unwrap();
    store.add_book(user_id, book_b, 1).unwrap();
    (user_id, book_a, book_b)
}

#[test]
fn checkout_snapshots_prices_and_sums_exactly() {
    let store = MemStore::new();
    let svc = service(&store);
    let (user_id, book_a, book_b) = user_with_stocked_cart(&store);

    let order = svc
        .place_order(user_id, "221B Baker Street".to_string())
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, dec("25.50"));
    assert_eq!(order.lines.len(), 2);

    let subtotal_of = |book_id: Uuid| {
        order
            .lines
            .iter()
            .find(|l| l.book_id == book_id)
            .unwrap()
            .subtotal
            .clone()
    };
    assert_eq!(subtotal_of(book_a), dec("20.00"));
    assert_eq!(subtotal_of(book_b), dec("5.50"));
}

#[test]
fn checkout_clears_the_cart() {
    let store = MemStore::new();
    let svc = service(&store);
    let (user_id, _, _) = user_with_stocked_cart(&store);

    svc.place_order(user_id, "somewhere".to_string()).unwrap();

    let cart = store.find_by_user_id(user_id).unwrap().unwrap();
    assert!(cart.lines.is_empty());
}

#[test]
fn checkout_without_cart_is_not_found_and_creates_nothing() {
    let store = MemStore::new();
    let svc = service(&store);
    let user_id = Uuid::new_v4();

    let err = svc
        .place_order(user_id, "somewhere".to_string())
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound));
    assert!(svc.order_history(user_id).unwrap().is_empty());
}

#[test]
fn empty_cart_checkout_is_rejected_and_creates_nothing() {
    let store = MemStore::new();
    let svc = service(&store);
    let user_id = Uuid::new_v4();
    store.create_cart(user_id);

    let err = svc
        .place_order(user_id, "somewhere".to_string())
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidState(_)));
    assert!(svc.order_history(user_id).unwrap().is_empty());
}

#[test]
fn repopulated_cart_produces_a_second_distinct_order() {
    let store = MemStore::new();
    let svc = service(&store);
    let (user_id, book_a, _) = user_with_stocked_cart(&store);

    let first = svc.place_order(user_id, "somewhere".to_string()).unwrap();

    store.add_book(user_id, book_a, 1).unwrap();
    let second = svc.place_order(user_id, "somewhere".to_string()).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.total, dec("25.50"));
    assert_eq!(second.total, dec("10.00"));

    let history = svc.order_history(user_id).unwrap();
    assert_eq!(history.len(), 2);
    // Most recent first.
    assert_eq!(history[0].id, second.id);
    assert_eq!(history[1].id, first.id);
}

#[test]
fn catalog_price_change_does_not_alter_an_existing_order() {
    let store = MemStore::new();
    let svc = service(&store);
    let (user_id, book_a, _) = user_with_stocked_cart(&store);

    let order = svc.place_order(user_id, "somewhere".to_string()).unwrap();
    store.set_price(book_a, "99.99");

    let reread = svc.get_order(order.id).unwrap();
    assert_eq!(reread.total, dec("25.50"));
    let line_a = reread.lines.iter().find(|l| l.book_id == book_a).unwrap();
    assert_eq!(line_a.subtotal, dec("20.00"));
}

#[test]
fn line_added_during_checkout_stays_in_the_cart() {
    let store = MemStore::new();
    let (user_id, _, _) = user_with_stocked_cart(&store);

    // Snapshot the cart, then add another book before the store write —
    // the checkout must only clear the lines it actually purchased.
    let cart = store.find_by_user_id(user_id).unwrap().unwrap();
    let order = NewOrder::from_cart(&cart, "somewhere".to_string()).unwrap();

    let book_c = store.stock_book("3.00");
    store.add_book(user_id, book_c, 1).unwrap();

    let placed = store.create(order).unwrap();
    assert_eq!(placed.lines.len(), 2);
    assert_eq!(placed.total, dec("25.50"));

    let cart_after = store.find_by_user_id(user_id).unwrap().unwrap();
    assert_eq!(cart_after.lines.len(), 1);
    assert_eq!(cart_after.lines[0].book_id, book_c);
}

#[test]
fn stale_checkout_of_a_consumed_cart_is_rejected() {
    let store = MemStore::new();
    let svc = service(&store);
    let (user_id, _, _) = user_with_stocked_cart(&store);

    // Two callers derive an order from the same cart snapshot; only the
    // first write wins, the second rolls back.
    let cart = store.find_by_user_id(user_id).unwrap().unwrap();
    let first = NewOrder::from_cart(&cart, "somewhere".to_string()).unwrap();
    let second = NewOrder::from_cart(&cart, "elsewhere".to_string()).unwrap();

    store.create(first).unwrap();
    let err = store.create(second).unwrap_err();
    assert!(matches!(err, DomainError::InvalidState(_)));

    assert_eq!(svc.order_history(user_id).unwrap().len(), 1);
}

#[test]
fn get_order_with_unknown_id_is_not_found() {
    let store = MemStore::new();
    let svc = service(&store);

    let err = svc.get_order(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}

#[test]
fn status_update_changes_status_and_nothing_else() {
    let store = MemStore::new();
    let svc = service(&store);
    let (user_id, _, _) = user_with_stocked_cart(&store);

    let order = svc.place_order(user_id, "somewhere".to_string()).unwrap();
    let updated = svc
        .update_order_status(order.id, OrderStatus::Shipped)
        .unwrap();

    assert_eq!(updated.status, OrderStatus::Shipped);
    assert_eq!(updated.total, order.total);
    assert_eq!(updated.lines.len(), order.lines.len());
}

#[test]
fn status_update_on_unknown_order_is_not_found() {
    let store = MemStore::new();
    let svc = service(&store);

    let err = svc
        .update_order_status(Uuid::new_v4(), OrderStatus::Shipped)
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}

#[test]
fn order_line_accessors() {
    let store = MemStore::new();
    let svc = service(&store);
    let (user_id, _, _) = user_with_stocked_cart(&store);

    let order = svc.place_order(user_id, "somewhere".to_string()).unwrap();

    let lines = svc.order_lines(order.id).unwrap();
    assert_eq!(lines.len(), 2);

    let line = svc.order_line(order.id, lines[0].id).unwrap();
    assert_eq!(line.subtotal, lines[0].subtotal);

    let err = svc.order_line(order.id, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, DomainError::NotFound));

    let err = svc.order_lines(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}
