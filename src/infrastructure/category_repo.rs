use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::book::ListResult;
use crate::domain::category::{CategoryView, NewCategory};
use crate::domain::errors::DomainError;
use crate::domain::ports::CategoryStore;
use crate::schema::categories;

use super::models::{CategoryChangeset, CategoryRow, NewCategoryRow};

pub struct DieselCategoryStore {
    pool: DbPool,
}

impl DieselCategoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn category_view(row: CategoryRow) -> CategoryView {
    CategoryView {
        id: row.id,
        name: row.name,
        description: row.description,
    }
}

impl CategoryStore for DieselCategoryStore {
    fn create(&self, category: NewCategory) -> Result<CategoryView, DomainError> {
        let mut conn = self.pool.get()?;

        let row: CategoryRow = diesel::insert_into(categories::table)
            .values(&NewCategoryRow {
                id: Uuid::new_v4(),
                name: category.name,
                description: category.description,
            })
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)?;

        Ok(category_view(row))
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = categories::table
            .find(id)
            .filter(categories::is_deleted.eq(false))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(category_view))
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult<CategoryView>, DomainError> {
        let mut conn = self.pool.get()?;
        let offset = (page - 1) * limit;

        let total: i64 = categories::table
            .filter(categories::is_deleted.eq(false))
            .count()
            .get_result(&mut conn)?;

        let rows: Vec<CategoryRow> = categories::table
            .filter(categories::is_deleted.eq(false))
            .order(categories::name.asc())
            .limit(limit)
            .offset(offset)
            .select(CategoryRow::as_select())
            .load(&mut conn)?;

        Ok(ListResult {
            items: rows.into_iter().map(category_view).collect(),
            total,
        })
    }

    fn update(
        &self,
        id: Uuid,
        category: NewCategory,
    ) -> Result<Option<CategoryView>, DomainError> {
        let mut conn = self.pool.get()?;

        let updated: Option<CategoryRow> = diesel::update(
            categories::table
                .find(id)
                .filter(categories::is_deleted.eq(false)),
        )
        .set(&CategoryChangeset {
            name: category.name,
            description: category.description,
        })
        .returning(CategoryRow::as_returning())
        .get_result(&mut conn)
        .optional()?;

        Ok(updated.map(category_view))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            categories::table
                .find(id)
                .filter(categories::is_deleted.eq(false)),
        )
        .set(categories::is_deleted.eq(true))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }
}
