use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserStore;
use crate::domain::user::{NewUser, UserView};
use crate::schema::{carts, users};

use super::models::{NewCartRow, NewUserRow, UserRow};

pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserStore for DieselUserStore {
    /// User and cart are inserted in one transaction so a registered user
    /// always has a cart to check out from. The unique index on email
    /// turns a duplicate registration into `InvalidState`.
    fn register(&self, user: NewUser) -> Result<UserView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row: UserRow = diesel::insert_into(users::table)
                .values(&NewUserRow {
                    id: Uuid::new_v4(),
                    email: user.email,
                    display_name: user.display_name,
                })
                .returning(UserRow::as_returning())
                .get_result(conn)?;

            diesel::insert_into(carts::table)
                .values(&NewCartRow {
                    id: Uuid::new_v4(),
                    user_id: row.id,
                })
                .execute(conn)?;

            Ok(UserView {
                id: row.id,
                email: row.email,
                display_name: row.display_name,
                created_at: row.created_at,
            })
        })
    }
}
