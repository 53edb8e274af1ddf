pub mod books;
pub mod cart;
pub mod categories;
pub mod identity;
pub mod orders;
pub mod users;
