use uuid::Uuid;

use crate::domain::cart::CartView;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartStore;

pub struct CartService<C> {
    carts: C,
}

impl<C: CartStore> CartService<C> {
    pub fn new(carts: C) -> Self {
        Self { carts }
    }

    pub fn get_cart(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        self.carts
            .find_by_user_id(user_id)?
            .ok_or(DomainError::NotFound)
    }

    pub fn add_book(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        validate_quantity(quantity)?;
        self.carts.add_book(user_id, book_id, quantity)
    }

    pub fn update_line(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        validate_quantity(quantity)?;
        self.carts.set_line_quantity(user_id, line_id, quantity)
    }

    pub fn remove_line(&self, user_id: Uuid, line_id: Uuid) -> Result<(), DomainError> {
        if self.carts.remove_line(user_id, line_id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }
}

fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::InvalidInput(format!(
            "Quantity must be at least 1, got {}",
            quantity
        )));
    }
    Ok(())
}
