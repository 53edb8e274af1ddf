use crate::domain::errors::DomainError;
use crate::domain::ports::UserStore;
use crate::domain::user::{NewUser, UserView};

pub struct UserService<U> {
    users: U,
}

impl<U: UserStore> UserService<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Register a new user. The store creates the user's empty cart in
    /// the same transaction, so a registered user always has a cart.
    pub fn register(&self, user: NewUser) -> Result<UserView, DomainError> {
        if user.email.trim().is_empty() {
            return Err(DomainError::InvalidInput("Email must not be empty".into()));
        }
        self.users.register(user)
    }
}
