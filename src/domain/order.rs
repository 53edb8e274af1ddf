use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::cart::CartView;
use super::errors::DomainError;

/// Fulfillment states. The set is closed but transitions are not
/// restricted: an administrative update may overwrite any status with
/// any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown order status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    /// The cart line this snapshot was taken from. The store clears
    /// exactly these lines at checkout; anything added to the cart after
    /// the snapshot stays in it.
    pub cart_line_id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

/// A fully derived order, ready to persist. `cart_id` names the cart whose
/// lines must be cleared in the same transaction that writes the order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub cart_id: Uuid,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub total: BigDecimal,
    pub lines: Vec<NewOrderLine>,
}

impl NewOrder {
    /// Derive an order from a cart: one order line per cart line, each
    /// subtotal frozen at the book's current unit price times quantity,
    /// and the total as the exact sum of subtotals.
    ///
    /// An empty cart is rejected; checking out nothing would otherwise
    /// produce a zero-total order with no lines.
    pub fn from_cart(cart: &CartView, shipping_address: String) -> Result<NewOrder, DomainError> {
        if cart.lines.is_empty() {
            return Err(DomainError::InvalidState(
                "Cannot place an order from an empty cart".to_string(),
            ));
        }

        let lines: Vec<NewOrderLine> = cart
            .lines
            .iter()
            .map(|line| NewOrderLine {
                cart_line_id: line.id,
                book_id: line.book_id,
                quantity: line.quantity,
                subtotal: &line.unit_price * BigDecimal::from(line.quantity),
            })
            .collect();

        let total = lines
            .iter()
            .fold(BigDecimal::from(0), |acc, line| acc + &line.subtotal);

        Ok(NewOrder {
            user_id: cart.user_id,
            cart_id: cart.id,
            status: OrderStatus::Pending,
            shipping_address,
            total,
            lines,
        })
    }
}
