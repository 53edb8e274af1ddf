//! In-memory implementation of the store ports for service-level tests.
//! It honors the same contracts the diesel stores do: `OrderStore::create`
//! persists the order and clears the cart as one atomic step, cart reads
//! join the book's current price, and a cart whose lines were already
//! consumed fails the checkout.
#![allow(dead_code)]

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use bookstore_service::domain::cart::{CartLineView, CartView};
use bookstore_service::domain::errors::DomainError;
use bookstore_service::domain::order::{NewOrder, OrderLineView, OrderStatus, OrderView};
use bookstore_service::domain::ports::{CartStore, OrderStore};

struct StoredLine {
    id: Uuid,
    book_id: Uuid,
    quantity: i32,
}

struct StoredCart {
    id: Uuid,
    user_id: Uuid,
    lines: Vec<StoredLine>,
}

#[derive(Default)]
struct State {
    prices: HashMap<Uuid, BigDecimal>,
    carts: Vec<StoredCart>,
    orders: Vec<OrderView>,
}

#[derive(Clone, Default)]
pub struct MemStore(Arc<Mutex<State>>);

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stock_book(&self, price: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.0
            .lock()
            .unwrap()
            .prices
            .insert(id, BigDecimal::from_str(price).unwrap());
        id
    }

    pub fn set_price(&self, book_id: Uuid, price: &str) {
        self.0
            .lock()
            .unwrap()
            .prices
            .insert(book_id, BigDecimal::from_str(price).unwrap());
    }

    pub fn create_cart(&self, user_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.0.lock().unwrap().carts.push(StoredCart {
            id,
            user_id,
            lines: Vec::new(),
        });
        id
    }
}

fn cart_view(state: &State, cart: &StoredCart) -> Result<CartView, DomainError> {
    let lines = cart
        .lines
        .iter()
        .map(|line| {
            let price = state
                .prices
                .get(&line.book_id)
                .cloned()
                .ok_or(DomainError::NotFound)?;
            Ok(CartLineView {
                id: line.id,
                book_id: line.book_id,
                quantity: line.quantity,
                unit_price: price,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    Ok(CartView {
        id: cart.id,
        user_id: cart.user_id,
        lines,
    })
}

impl CartStore for MemStore {
    fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<CartView>, DomainError> {
        let state = self.0.lock().unwrap();
        let Some(cart) = state.carts.iter().find(|c| c.user_id == user_id) else {
            return Ok(None);
        };
        cart_view(&state, cart).map(Some)
    }

    fn add_book(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        let mut state = self.0.lock().unwrap();
        if !state.prices.contains_key(&book_id) {
            return Err(DomainError::NotFound);
        }
        let cart = state
            .carts
            .iter_mut()
            .find(|c| c.user_id == user_id)
            .ok_or(DomainError::NotFound)?;

        match cart.lines.iter_mut().find(|l| l.book_id == book_id) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity).ok_or_else(|| {
                    DomainError::InvalidInput("Quantity exceeds the supported maximum".to_string())
                })?;
            }
            None => cart.lines.push(StoredLine {
                id: Uuid::new_v4(),
                book_id,
                quantity,
            }),
        }

        let cart = state.carts.iter().find(|c| c.user_id == user_id).unwrap();
        cart_view(&state, cart)
    }

    fn set_line_quantity(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        let mut state = self.0.lock().unwrap();
        let cart = state
            .carts
            .iter_mut()
            .find(|c| c.user_id == user_id)
            .ok_or(DomainError::NotFound)?;
        let line = cart
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(DomainError::NotFound)?;
        line.quantity = quantity;

        let cart = state.carts.iter().find(|c| c.user_id == user_id).unwrap();
        cart_view(&state, cart)
    }

    fn remove_line(&self, user_id: Uuid, line_id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.0.lock().unwrap();
        let cart = state
            .carts
            .iter_mut()
            .find(|c| c.user_id == user_id)
            .ok_or(DomainError::NotFound)?;
        let before = cart.lines.len();
        cart.lines.retain(|l| l.id != line_id);
        Ok(cart.lines.len() < before)
    }
}

impl OrderStore for MemStore {
    fn create(&self, order: NewOrder) -> Result<OrderView, DomainError> {
        // One lock held for the whole step: the order insert and the cart
        // clear are as atomic here as the diesel transaction in production.
        let mut state = self.0.lock().unwrap();

        let cart = state
            .carts
            .iter_mut()
            .find(|c| c.id == order.cart_id)
            .ok_or(DomainError::NotFound)?;

        // Clear exactly the snapshotted lines; a shortfall means another
        // checkout consumed them first, and nothing changes.
        let snapshot_ids: Vec<Uuid> = order.lines.iter().map(|l| l.cart_line_id).collect();
        let matched = cart
            .lines
            .iter()
            .filter(|l| snapshot_ids.contains(&l.id))
            .count();
        if matched != snapshot_ids.len() {
            return Err(DomainError::InvalidState(
                "Cart was already checked out".to_string(),
            ));
        }
        cart.lines.retain(|l| !snapshot_ids.contains(&l.id));

        let view = OrderView {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            status: order.status,
            shipping_address: order.shipping_address,
            total: order.total,
            created_at: Utc::now(),
            lines: order
                .lines
                .into_iter()
                .map(|l| OrderLineView {
                    id: Uuid::new_v4(),
                    book_id: l.book_id,
                    quantity: l.quantity,
                    subtotal: l.subtotal,
                })
                .collect(),
        };
        state.orders.push(view.clone());
        Ok(view)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state.orders.iter().find(|o| o.id == id).cloned())
    }

    fn find_orders_by_user_id(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError> {
        let mut state = self.0.lock().unwrap();
        let Some(order) = state.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.status = status;
        Ok(Some(order.clone()))
    }

    fn find_lines(&self, order_id: Uuid) -> Result<Option<Vec<OrderLineView>>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .map(|o| o.lines.clone()))
    }

    fn find_line(
        &self,
        order_id: Uuid,
        line_id: Uuid,
    ) -> Result<Option<OrderLineView>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .and_then(|o| o.lines.iter().find(|l| l.id == line_id).cloned()))
    }
}
