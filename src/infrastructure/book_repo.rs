use std::collections::HashMap;

use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::book::{BookView, ListResult, NewBook};
use crate::domain::errors::DomainError;
use crate::domain::ports::BookStore;
use crate::schema::{book_categories, books};

use super::models::{BookCategoryRow, BookChangeset, BookRow, NewBookRow};

pub struct DieselBookStore {
    pool: DbPool,
}

impl DieselBookStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn book_view(row: BookRow, category_ids: Vec<Uuid>) -> BookView {
    BookView {
        id: row.id,
        title: row.title,
        author: row.author,
        isbn: row.isbn,
        price: row.price,
        description: row.description,
        cover_image: row.cover_image,
        category_ids,
    }
}

fn category_ids_for(conn: &mut PgConnection, book_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
    book_categories::table
        .filter(book_categories::book_id.eq(book_id))
        .select(book_categories::category_id)
        .load(conn)
        .map_err(Into::into)
}

/// One query for the category ids of a whole page of books.
fn category_ids_by_book(
    conn: &mut PgConnection,
    book_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Uuid>>, DomainError> {
    let pairs: Vec<(Uuid, Uuid)> = book_categories::table
        .filter(book_categories::book_id.eq_any(book_ids))
        .select((book_categories::book_id, book_categories::category_id))
        .load(conn)?;

    let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (book_id, category_id) in pairs {
        map.entry(book_id).or_default().push(category_id);
    }
    Ok(map)
}

fn replace_category_links(
    conn: &mut PgConnection,
    book_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), DomainError> {
    diesel::delete(book_categories::table.filter(book_categories::book_id.eq(book_id)))
        .execute(conn)?;

    let links: Vec<BookCategoryRow> = category_ids
        .iter()
        .map(|&category_id| BookCategoryRow {
            book_id,
            category_id,
        })
        .collect();
    diesel::insert_into(book_categories::table)
        .values(&links)
        .execute(conn)?;
    Ok(())
}

impl BookStore for DieselBookStore {
    fn create(&self, book: NewBook) -> Result<BookView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row: BookRow = diesel::insert_into(books::table)
                .values(&NewBookRow {
                    id: Uuid::new_v4(),
                    title: book.title,
                    author: book.author,
                    isbn: book.isbn,
                    price: book.price,
                    description: book.description,
                    cover_image: book.cover_image,
                })
                .returning(BookRow::as_returning())
                .get_result(conn)?;

            replace_category_links(conn, row.id, &book.category_ids)?;
            Ok(book_view(row, book.category_ids))
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<BookView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = books::table
            .find(id)
            .filter(books::is_deleted.eq(false))
            .select(BookRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };
        let category_ids = category_ids_for(&mut conn, row.id)?;
        Ok(Some(book_view(row, category_ids)))
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult<BookView>, DomainError> {
        let mut conn = self.pool.get()?;
        let offset = (page - 1) * limit;

        let total: i64 = books::table
            .filter(books::is_deleted.eq(false))
            .count()
            .get_result(&mut conn)?;

        let rows: Vec<BookRow> = books::table
            .filter(books::is_deleted.eq(false))
            .order(books::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(BookRow::as_select())
            .load(&mut conn)?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut links = category_ids_by_book(&mut conn, &ids)?;

        Ok(ListResult {
            items: rows
                .into_iter()
                .map(|row| {
                    let category_ids = links.remove(&row.id).unwrap_or_default();
                    book_view(row, category_ids)
                })
                .collect(),
            total,
        })
    }

    fn update(&self, id: Uuid, book: NewBook) -> Result<Option<BookView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated: Option<BookRow> = diesel::update(
                books::table.find(id).filter(books::is_deleted.eq(false)),
            )
            .set(&BookChangeset {
                title: book.title,
                author: book.author,
                isbn: book.isbn,
                price: book.price,
                description: book.description,
                cover_image: book.cover_image,
            })
            .returning(BookRow::as_returning())
            .get_result(conn)
            .optional()?;

            let Some(row) = updated else {
                return Ok(None);
            };

            replace_category_links(conn, row.id, &book.category_ids)?;
            Ok(Some(book_view(row, book.category_ids)))
        })
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(books::table.find(id).filter(books::is_deleted.eq(false)))
            .set(books::is_deleted.eq(true))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    fn find_by_category(&self, category_id: Uuid) -> Result<Vec<BookView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<BookRow> = books::table
            .inner_join(book_categories::table)
            .filter(book_categories::category_id.eq(category_id))
            .filter(books::is_deleted.eq(false))
            .order(books::created_at.desc())
            .select(BookRow::as_select())
            .load(&mut conn)?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut links = category_ids_by_book(&mut conn, &ids)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let category_ids = links.remove(&row.id).unwrap_or_default();
                book_view(row, category_ids)
            })
            .collect())
    }
}
