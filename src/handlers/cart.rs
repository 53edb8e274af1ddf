use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cart::CartView;
use crate::errors::AppError;
use crate::AppCartService;

use super::identity::CallerId;

#[derive(Debug, Deserialize)]
pub struct AddCartLineRequest {
    pub book_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartLineRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
    /// The book's current catalog price, not a snapshot.
    pub unit_price: String,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lines: Vec<CartLineResponse>,
}

fn cart_response(cart: CartView) -> CartResponse {
    CartResponse {
        id: cart.id,
        user_id: cart.user_id,
        lines: cart
            .lines
            .into_iter()
            .map(|line| CartLineResponse {
                id: line.id,
                book_id: line.book_id,
                quantity: line.quantity,
                unit_price: line.unit_price.to_string(),
            })
            .collect(),
    }
}

/// GET /cart
pub async fn get_cart(
    svc: web::Data<AppCartService>,
    caller: CallerId,
) -> Result<HttpResponse, AppError> {
    let cart = web::block(move || svc.get_cart(caller.0))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(cart_response(cart)))
}

/// POST /cart
///
/// Adds a book to the caller's cart, merging quantity into an existing
/// line for the same book.
pub async fn add_book(
    svc: web::Data<AppCartService>,
    caller: CallerId,
    body: web::Json<AddCartLineRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let cart = web::block(move || svc.add_book(caller.0, body.book_id, body.quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(cart_response(cart)))
}

/// PUT /cart/items/{id}
pub async fn update_line(
    svc: web::Data<AppCartService>,
    caller: CallerId,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCartLineRequest>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    let quantity = body.quantity;

    let cart = web::block(move || svc.update_line(caller.0, line_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(cart_response(cart)))
}

/// DELETE /cart/items/{id}
pub async fn remove_line(
    svc: web::Data<AppCartService>,
    caller: CallerId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();

    web::block(move || svc.remove_line(caller.0, line_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
