use uuid::Uuid;

use crate::domain::book::{BookView, ListResult, NewBook};
use crate::domain::errors::DomainError;
use crate::domain::ports::BookStore;

pub struct BookService<B> {
    books: B,
}

impl<B: BookStore> BookService<B> {
    pub fn new(books: B) -> Self {
        Self { books }
    }

    pub fn create(&self, book: NewBook) -> Result<BookView, DomainError> {
        self.books.create(book)
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<BookView, DomainError> {
        self.books.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list(&self, page: i64, limit: i64) -> Result<ListResult<BookView>, DomainError> {
        self.books.list(page, limit)
    }

    pub fn update(&self, id: Uuid, book: NewBook) -> Result<BookView, DomainError> {
        self.books.update(id, book)?.ok_or(DomainError::NotFound)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if self.books.delete(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    pub fn list_by_category(&self, category_id: Uuid) -> Result<Vec<BookView>, DomainError> {
        self.books.find_by_category(category_id)
    }
}
