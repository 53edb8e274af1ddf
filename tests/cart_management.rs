//! Cart management tests at the store-port seam.

mod common;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use bookstore_service::application::cart_service::CartService;
use bookstore_service::domain::errors::DomainError;

use common::MemStore;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

#[test]
fn adding_the_same_book_twice_merges_into_one_line() {
    let store = MemStore::new();
    let svc = CartService::new(store.clone());
    let user_id = Uuid::new_v4();
    store.create_cart(user_id);
    let book = store.stock_book("7.25");

    svc.add_book(user_id, book, 1).unwrap();
    let cart = svc.add_book(user_id, book, 2).unwrap();

    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].quantity, 3);
    assert_eq!(cart.lines[0].unit_price, dec("7.25"));
}

#[test]
fn adding_an_unknown_book_is_not_found() {
    let store = MemStore::new();
    let svc = CartService::new(store.clone());
    let user_id = Uuid::new_v4();
    store.create_cart(user_id);

    let err = svc.add_book(user_id, Uuid::new_v4(), 1).unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}

#[test]
fn non_positive_quantities_are_rejected_before_the_store() {
    let store = MemStore::new();
    let svc = CartService::new(store.clone());
    let user_id = Uuid::new_v4();
    store.create_cart(user_id);
    let book = store.stock_book("7.25");

    let err = svc.add_book(user_id, book, 0).unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    let line_id = svc.add_book(user_id, book, 1).unwrap().lines[0].id;
    let err = svc.update_line(user_id, line_id, -1).unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[test]
fn merging_beyond_the_quantity_maximum_is_rejected() {
    let store = MemStore::new();
    let svc = CartService::new(store.clone());
    let user_id = Uuid::new_v4();
    store.create_cart(user_id);
    let book = store.stock_book("7.25");

    svc.add_book(user_id, book, 1).unwrap();
    let err = svc.add_book(user_id, book, i32::MAX).unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    // The failed merge leaves the line untouched.
    let cart = svc.get_cart(user_id).unwrap();
    assert_eq!(cart.lines[0].quantity, 1);
}

#[test]
fn updating_a_line_overwrites_its_quantity() {
    let store = MemStore::new();
    let svc = CartService::new(store.clone());
    let user_id = Uuid::new_v4();
    store.create_cart(user_id);
    let book = store.stock_book("3.00");

    let line_id = svc.add_book(user_id, book, 2).unwrap().lines[0].id;
    let cart = svc.update_line(user_id, line_id, 5).unwrap();

    assert_eq!(cart.lines[0].quantity, 5);
}

#[test]
fn updating_a_line_from_another_users_cart_is_not_found() {
    let store = MemStore::new();
    let svc = CartService::new(store.clone());
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    store.create_cart(owner);
    store.create_cart(intruder);
    let book = store.stock_book("3.00");

    let line_id = svc.add_book(owner, book, 2).unwrap().lines[0].id;

    let err = svc.update_line(intruder, line_id, 5).unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}

#[test]
fn removing_a_line_empties_the_cart() {
    let store = MemStore::new();
    let svc = CartService::new(store.clone());
    let user_id = Uuid::new_v4();
    store.create_cart(user_id);
    let book = store.stock_book("3.00");

    let line_id = svc.add_book(user_id, book, 2).unwrap().lines[0].id;
    svc.remove_line(user_id, line_id).unwrap();

    let cart = svc.get_cart(user_id).unwrap();
    assert!(cart.lines.is_empty());
}

#[test]
fn removing_an_unknown_line_is_not_found() {
    let store = MemStore::new();
    let svc = CartService::new(store.clone());
    let user_id = Uuid::new_v4();
    store.create_cart(user_id);

    let err = svc.remove_line(user_id, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}

#[test]
fn cart_for_user_without_one_is_not_found() {
    let store = MemStore::new();
    let svc = CartService::new(store);

    let err = svc.get_cart(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}
