pub mod book_service;
pub mod cart_service;
pub mod category_service;
pub mod order_service;
pub mod user_service;
