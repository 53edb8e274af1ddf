use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::{CartLineView, CartView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartStore;
use crate::schema::{books, cart_lines, carts};

use super::models::{CartLineRow, CartRow, NewCartLineRow};

pub struct DieselCartStore {
    pool: DbPool,
}

impl DieselCartStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn live_cart_by_user(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> Result<Option<CartRow>, DomainError> {
    carts::table
        .filter(carts::user_id.eq(user_id))
        .filter(carts::is_deleted.eq(false))
        .select(CartRow::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

/// Lines joined with the book's current catalog price.
fn load_lines(conn: &mut PgConnection, cart_id: Uuid) -> Result<Vec<CartLineView>, DomainError> {
    let rows: Vec<(CartLineRow, bigdecimal::BigDecimal)> = cart_lines::table
        .inner_join(books::table)
        .filter(cart_lines::cart_id.eq(cart_id))
        .select((CartLineRow::as_select(), books::price))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(line, price)| CartLineView {
            id: line.id,
            book_id: line.book_id,
            quantity: line.quantity,
            unit_price: price,
        })
        .collect())
}

fn cart_view(conn: &mut PgConnection, cart: CartRow) -> Result<CartView, DomainError> {
    let lines = load_lines(conn, cart.id)?;
    Ok(CartView {
        id: cart.id,
        user_id: cart.user_id,
        lines,
    })
}

impl CartStore for DieselCartStore {
    fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<CartView>, DomainError> {
        let mut conn = self.pool.get()?;

        let Some(cart) = live_cart_by_user(&mut conn, user_id)? else {
            return Ok(None);
        };
        cart_view(&mut conn, cart).map(Some)
    }

    fn add_book(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let cart = live_cart_by_user(conn, user_id)?.ok_or(DomainError::NotFound)?;

            let book_exists: Option<Uuid> = books::table
                .find(book_id)
                .filter(books::is_deleted.eq(false))
                .select(books::id)
                .first(conn)
                .optional()?;
            if book_exists.is_none() {
                return Err(DomainError::NotFound);
            }

            let existing: Option<CartLineRow> = cart_lines::table
                .filter(cart_lines::cart_id.eq(cart.id))
                .filter(cart_lines::book_id.eq(book_id))
                .select(CartLineRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;

            match existing {
                Some(line) => {
                    let merged = line.quantity.checked_add(quantity).ok_or_else(|| {
                        DomainError::InvalidInput(
                            "Quantity exceeds the supported maximum".to_string(),
                        )
                    })?;
                    diesel::update(cart_lines::table.find(line.id))
                        .set(cart_lines::quantity.eq(merged))
                        .execute(conn)?;
                }
                None => {
                    diesel::insert_into(cart_lines::table)
                        .values(&NewCartLineRow {
                            id: Uuid::new_v4(),
                            cart_id: cart.id,
                            book_id,
                            quantity,
                        })
                        .execute(conn)?;
                }
            }

            cart_view(conn, cart)
        })
    }

    fn set_line_quantity(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let cart = live_cart_by_user(conn, user_id)?.ok_or(DomainError::NotFound)?;

            let updated = diesel::update(
                cart_lines::table
                    .filter(cart_lines::id.eq(line_id))
                    .filter(cart_lines::cart_id.eq(cart.id)),
            )
            .set(cart_lines::quantity.eq(quantity))
            .execute(conn)?;
            if updated == 0 {
                return Err(DomainError::NotFound);
            }

            cart_view(conn, cart)
        })
    }

    fn remove_line(&self, user_id: Uuid, line_id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let cart = live_cart_by_user(&mut conn, user_id)?.ok_or(DomainError::NotFound)?;

        let deleted = diesel::delete(
            cart_lines::table
                .filter(cart_lines::id.eq(line_id))
                .filter(cart_lines::cart_id.eq(cart.id)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
