use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderLineView, OrderStatus, OrderView};
use crate::domain::ports::{CartStore, OrderStore};

/// The cart-to-order workflow plus the read side of orders. This is the
/// only place where two aggregates (cart and order) change together; the
/// write itself goes through `OrderStore::create`, whose contract makes
/// the order insert and the cart clear one transaction.
pub struct OrderService<C, O> {
    carts: C,
    orders: O,
}

impl<C: CartStore, O: OrderStore> OrderService<C, O> {
    pub fn new(carts: C, orders: O) -> Self {
        Self { carts, orders }
    }

    /// Check out the user's cart into a new PENDING order.
    ///
    /// Prices are read once, here, and frozen into the order lines; later
    /// catalog changes never touch an existing order. Fails with
    /// `NotFound` when the user has no cart and `InvalidState` when the
    /// cart is empty.
    pub fn place_order(
        &self,
        user_id: Uuid,
        shipping_address: String,
    ) -> Result<OrderView, DomainError> {
        let cart = self
            .carts
            .find_by_user_id(user_id)?
            .ok_or(DomainError::NotFound)?;

        let order = NewOrder::from_cart(&cart, shipping_address)?;
        self.orders.create(order)
    }

    pub fn get_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        self.orders.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn order_history(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        self.orders.find_orders_by_user_id(user_id)
    }

    pub fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderView, DomainError> {
        self.orders
            .update_status(id, status)?
            .ok_or(DomainError::NotFound)
    }

    pub fn order_lines(&self, order_id: Uuid) -> Result<Vec<OrderLineView>, DomainError> {
        self.orders
            .find_lines(order_id)?
            .ok_or(DomainError::NotFound)
    }

    pub fn order_line(
        &self,
        order_id: Uuid,
        line_id: Uuid,
    ) -> Result<OrderLineView, DomainError> {
        self.orders
            .find_line(order_id, line_id)?
            .ok_or(DomainError::NotFound)
    }
}
