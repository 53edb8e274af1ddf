use uuid::Uuid;

use crate::domain::book::ListResult;
use crate::domain::category::{CategoryView, NewCategory};
use crate::domain::errors::DomainError;
use crate::domain::ports::CategoryStore;

pub struct CategoryService<S> {
    categories: S,
}

impl<S: CategoryStore> CategoryService<S> {
    pub fn new(categories: S) -> Self {
        Self { categories }
    }

    pub fn create(&self, category: NewCategory) -> Result<CategoryView, DomainError> {
        self.categories.create(category)
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<CategoryView, DomainError> {
        self.categories
            .find_by_id(id)?
            .ok_or(DomainError::NotFound)
    }

    pub fn list(&self, page: i64, limit: i64) -> Result<ListResult<CategoryView>, DomainError> {
        self.categories.list(page, limit)
    }

    pub fn update(&self, id: Uuid, category: NewCategory) -> Result<CategoryView, DomainError> {
        self.categories
            .update(id, category)?
            .ok_or(DomainError::NotFound)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if self.categories.delete(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }
}
