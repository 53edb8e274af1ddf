use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::book::{BookView, NewBook};
use crate::errors::AppError;
use crate::AppBookService;

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub category_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub(super) fn default_page() -> i64 {
    1
}

pub(super) fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct ListBooksResponse {
    pub items: Vec<BookResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

fn book_response(book: BookView) -> BookResponse {
    BookResponse {
        id: book.id,
        title: book.title,
        author: book.author,
        isbn: book.isbn,
        price: book.price.to_string(),
        description: book.description,
        cover_image: book.cover_image,
        category_ids: book.category_ids,
    }
}

fn new_book(request: BookRequest) -> Result<NewBook, AppError> {
    let price = BigDecimal::from_str(&request.price)
        .map_err(|e| AppError::BadRequest(format!("Invalid price '{}': {}", request.price, e)))?;
    Ok(NewBook {
        title: request.title,
        author: request.author,
        isbn: request.isbn,
        price,
        description: request.description,
        cover_image: request.cover_image,
        category_ids: request.category_ids,
    })
}

/// POST /books
pub async fn create_book(
    svc: web::Data<AppBookService>,
    body: web::Json<BookRequest>,
) -> Result<HttpResponse, AppError> {
    let book = new_book(body.into_inner())?;

    let created = web::block(move || svc.create(book))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(book_response(created)))
}

/// GET /books/{id}
pub async fn get_book(
    svc: web::Data<AppBookService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let book_id = path.into_inner();

    let book = web::block(move || svc.get_by_id(book_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(book_response(book)))
}

/// GET /books
pub async fn list_books(
    svc: web::Data<AppBookService>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = web::block(move || svc.list(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListBooksResponse {
        items: result.items.into_iter().map(book_response).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// PUT /books/{id}
pub async fn update_book(
    svc: web::Data<AppBookService>,
    path: web::Path<Uuid>,
    body: web::Json<BookRequest>,
) -> Result<HttpResponse, AppError> {
    let book_id = path.into_inner();
    let book = new_book(body.into_inner())?;

    let updated = web::block(move || svc.update(book_id, book))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(book_response(updated)))
}

/// DELETE /books/{id}
pub async fn delete_book(
    svc: web::Data<AppBookService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let book_id = path.into_inner();

    web::block(move || svc.delete(book_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /categories/{id}/books
pub async fn list_books_by_category(
    svc: web::Data<AppBookService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let category_id = path.into_inner();

    let books = web::block(move || svc.list_by_category(category_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<BookResponse> = books.into_iter().map(book_response).collect();
    Ok(HttpResponse::Ok().json(body))
}
