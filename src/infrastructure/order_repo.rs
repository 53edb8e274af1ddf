use std::str::FromStr;

use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderLineView, OrderStatus, OrderView};
use crate::domain::ports::OrderStore;
use crate::schema::{cart_lines, carts, order_lines, orders};

use super::models::{NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn line_view(row: OrderLineRow) -> OrderLineView {
    OrderLineView {
        id: row.id,
        book_id: row.book_id,
        quantity: row.quantity,
        subtotal: row.subtotal,
    }
}

fn order_view(order: OrderRow, lines: Vec<OrderLineRow>) -> Result<OrderView, DomainError> {
    // A status column this layer cannot parse means the row is corrupt.
    let status = OrderStatus::from_str(&order.status)
        .map_err(|_| DomainError::Storage(format!("Corrupt order status '{}'", order.status)))?;
    Ok(OrderView {
        id: order.id,
        user_id: order.user_id,
        status,
        shipping_address: order.shipping_address,
        total: order.total,
        created_at: order.created_at,
        lines: lines.into_iter().map(line_view).collect(),
    })
}

impl OrderStore for DieselOrderStore {
    /// Inserts the order and its lines and clears the source cart inside
    /// one transaction. The cart row is locked up front so two checkouts
    /// of the same cart serialize; the one that loses the race finds the
    /// lines already gone and rolls back.
    fn create(&self, order: NewOrder) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let locked_cart: Option<Uuid> = carts::table
                .find(order.cart_id)
                .select(carts::id)
                .for_update()
                .first(conn)
                .optional()?;
            if locked_cart.is_none() {
                return Err(DomainError::NotFound);
            }

            let order_row: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: Uuid::new_v4(),
                    user_id: order.user_id,
                    status: order.status.as_str().to_string(),
                    shipping_address: order.shipping_address.clone(),
                    total: order.total.clone(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            let new_lines: Vec<NewOrderLineRow> = order
                .lines
                .iter()
                .map(|l| NewOrderLineRow {
                    id: Uuid::new_v4(),
                    order_id: order_row.id,
                    book_id: l.book_id,
                    quantity: l.quantity,
                    subtotal: l.subtotal.clone(),
                })
                .collect();
            let line_rows: Vec<OrderLineRow> = diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .returning(OrderLineRow::as_returning())
                .get_results(conn)?;

            // Clear exactly the lines that were snapshotted into the
            // order. Lines added to the cart after the snapshot stay in
            // it; a shortfall means another checkout consumed them first.
            let snapshot_ids: Vec<Uuid> = order.lines.iter().map(|l| l.cart_line_id).collect();
            let cleared = diesel::delete(
                cart_lines::table
                    .filter(cart_lines::cart_id.eq(order.cart_id))
                    .filter(cart_lines::id.eq_any(&snapshot_ids)),
            )
            .execute(conn)?;
            if cleared != snapshot_ids.len() {
                return Err(DomainError::InvalidState(
                    "Cart was already checked out".to_string(),
                ));
            }

            order_view(order_row, line_rows)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderLineRow::belonging_to(&order)
            .select(OrderLineRow::as_select())
            .load(&mut conn)?;

        order_view(order, lines).map(Some)
    }

    fn find_orders_by_user_id(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order_rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .order(orders::created_at.desc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        let line_rows = OrderLineRow::belonging_to(&order_rows)
            .select(OrderLineRow::as_select())
            .load(&mut conn)?;

        line_rows
            .grouped_by(&order_rows)
            .into_iter()
            .zip(order_rows)
            .map(|(lines, order)| order_view(order, lines))
            .collect()
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let updated: Option<OrderRow> = diesel::update(orders::table.find(id))
            .set(orders::status.eq(status.as_str()))
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        let Some(order) = updated else {
            return Ok(None);
        };

        let lines = OrderLineRow::belonging_to(&order)
            .select(OrderLineRow::as_select())
            .load(&mut conn)?;

        order_view(order, lines).map(Some)
    }

    fn find_lines(&self, order_id: Uuid) -> Result<Option<Vec<OrderLineView>>, DomainError> {
        let mut conn = self.pool.get()?;

        let exists: Option<Uuid> = orders::table
            .find(order_id)
            .select(orders::id)
            .first(&mut conn)
            .optional()?;
        if exists.is_none() {
            return Ok(None);
        }

        let lines: Vec<OrderLineRow> = order_lines::table
            .filter(order_lines::order_id.eq(order_id))
            .select(OrderLineRow::as_select())
            .load(&mut conn)?;

        Ok(Some(lines.into_iter().map(line_view).collect()))
    }

    fn find_line(
        &self,
        order_id: Uuid,
        line_id: Uuid,
    ) -> Result<Option<OrderLineView>, DomainError> {
        let mut conn = self.pool.get()?;

        let line = order_lines::table
            .filter(order_lines::id.eq(line_id))
            .filter(order_lines::order_id.eq(order_id))
            .select(OrderLineRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(line.map(line_view))
    }
}
