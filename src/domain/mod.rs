pub mod book;
pub mod cart;
pub mod category;
pub mod errors;
pub mod order;
pub mod ports;
pub mod user;
