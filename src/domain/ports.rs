use uuid::Uuid;

use super::book::{BookView, ListResult, NewBook};
use super::cart::CartView;
use super::category::{CategoryView, NewCategory};
use super::errors::DomainError;
use super::order::{NewOrder, OrderLineView, OrderStatus, OrderView};
use super::user::{NewUser, UserView};

pub trait UserStore: Send + Sync + 'static {
    /// Persist the user and their empty cart as one unit. A duplicate
    /// email fails with `InvalidState`.
    fn register(&self, user: NewUser) -> Result<UserView, DomainError>;
}

pub trait BookStore: Send + Sync + 'static {
    fn create(&self, book: NewBook) -> Result<BookView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<BookView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult<BookView>, DomainError>;
    fn update(&self, id: Uuid, book: NewBook) -> Result<Option<BookView>, DomainError>;
    /// Soft delete. Returns false when no live book had this id.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    fn find_by_category(&self, category_id: Uuid) -> Result<Vec<BookView>, DomainError>;
}

pub trait CategoryStore: Send + Sync + 'static {
    fn create(&self, category: NewCategory) -> Result<CategoryView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult<CategoryView>, DomainError>;
    fn update(&self, id: Uuid, category: NewCategory)
        -> Result<Option<CategoryView>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait CartStore: Send + Sync + 'static {
    /// The user's cart with lines joined to current book prices.
    fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<CartView>, DomainError>;
    /// Add a book to the user's cart, merging the quantity into an
    /// existing line for the same book.
    fn add_book(&self, user_id: Uuid, book_id: Uuid, quantity: i32)
        -> Result<CartView, DomainError>;
    /// Overwrite a line's quantity. The line must belong to the user's cart.
    fn set_line_quantity(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError>;
    /// Remove a line from the user's cart. Returns false when no such
    /// line exists in it.
    fn remove_line(&self, user_id: Uuid, line_id: Uuid) -> Result<bool, DomainError>;
}

pub trait OrderStore: Send + Sync + 'static {
    /// Persist the order with its lines AND clear the source cart's lines
    /// as one all-or-nothing transaction. Implementations must serialize
    /// concurrent checkouts of the same cart (e.g. by locking the cart
    /// row) and fail with `InvalidState` when the cart's lines were
    /// already consumed by a concurrent checkout.
    fn create(&self, order: NewOrder) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    /// All orders for the user, most recent first.
    fn find_orders_by_user_id(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError>;
    /// Lines of an order; `None` when the order itself is absent.
    fn find_lines(&self, order_id: Uuid) -> Result<Option<Vec<OrderLineView>>, DomainError>;
    fn find_line(
        &self,
        order_id: Uuid,
        line_id: Uuid,
    ) -> Result<Option<OrderLineView>, DomainError>;
}
