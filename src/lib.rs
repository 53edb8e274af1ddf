pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use application::book_service::BookService;
use application::cart_service::CartService;
use application::category_service::CategoryService;
use application::order_service::OrderService;
use application::user_service::UserService;
use infrastructure::book_repo::DieselBookStore;
use infrastructure::cart_repo::DieselCartStore;
use infrastructure::category_repo::DieselCategoryStore;
use infrastructure::order_repo::DieselOrderStore;
use infrastructure::user_repo::DieselUserStore;

pub use db::{create_pool, DbPool};

/// Service types as wired against the diesel stores.
pub type AppUserService = UserService<DieselUserStore>;
pub type AppBookService = BookService<DieselBookStore>;
pub type AppCategoryService = CategoryService<DieselCategoryStore>;
pub type AppCartService = CartService<DieselCartStore>;
pub type AppOrderService = OrderService<DieselCartStore, DieselOrderStore>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        let users = web::Data::new(UserService::new(DieselUserStore::new(pool.clone())));
        let books = web::Data::new(BookService::new(DieselBookStore::new(pool.clone())));
        let categories =
            web::Data::new(CategoryService::new(DieselCategoryStore::new(pool.clone())));
        let carts = web::Data::new(CartService::new(DieselCartStore::new(pool.clone())));
        let orders = web::Data::new(OrderService::new(
            DieselCartStore::new(pool.clone()),
            DieselOrderStore::new(pool.clone()),
        ));

        App::new()
            .app_data(users)
            .app_data(books)
            .app_data(categories)
            .app_data(carts)
            .app_data(orders)
            .wrap(Logger::default())
            .service(web::scope("/users").route("", web::post().to(handlers::users::register)))
            .service(
                web::scope("/books")
                    .route("", web::post().to(handlers::books::create_book))
                    .route("", web::get().to(handlers::books::list_books))
                    .route("/{id}", web::get().to(handlers::books::get_book))
                    .route("/{id}", web::put().to(handlers::books::update_book))
                    .route("/{id}", web::delete().to(handlers::books::delete_book)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::post().to(handlers::categories::create_category))
                    .route("", web::get().to(handlers::categories::list_categories))
                    .route("/{id}", web::get().to(handlers::categories::get_category))
                    .route("/{id}", web::put().to(handlers::categories::update_category))
                    .route(
                        "/{id}",
                        web::delete().to(handlers::categories::delete_category),
                    )
                    .route(
                        "/{id}/books",
                        web::get().to(handlers::books::list_books_by_category),
                    ),
            )
            .service(
                web::scope("/cart")
                    .route("", web::get().to(handlers::cart::get_cart))
                    .route("", web::post().to(handlers::cart::add_book))
                    .route("/items/{id}", web::put().to(handlers::cart::update_line))
                    .route("/items/{id}", web::delete().to(handlers::cart::remove_line)),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::place_order))
                    .route("", web::get().to(handlers::orders::order_history))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route(
                        "/{id}",
                        web::patch().to(handlers::orders::update_order_status),
                    )
                    .route(
                        "/{id}/items",
                        web::get().to(handlers::orders::get_order_lines),
                    )
                    .route(
                        "/{id}/items/{item_id}",
                        web::get().to(handlers::orders::get_order_line),
                    ),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
