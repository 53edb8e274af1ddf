use bigdecimal::BigDecimal;
use uuid::Uuid;

/// A cart line joined with the book's current catalog price. The price here
/// is a live read, not a snapshot; it becomes a snapshot only when the line
/// is turned into an order line at checkout.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lines: Vec<CartLineView>,
}
