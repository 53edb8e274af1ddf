use std::str::FromStr;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::order::{OrderLineView, OrderStatus, OrderView};
use crate::errors::AppError;
use crate::AppOrderService;

use super::identity::CallerId;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub shipping_address: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
    /// Decimal amount as a string to avoid floating-point issues, e.g. "25.50"
    pub subtotal: String,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub shipping_address: String,
    pub total: String,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

fn line_response(line: OrderLineView) -> OrderLineResponse {
    OrderLineResponse {
        id: line.id,
        book_id: line.book_id,
        quantity: line.quantity,
        subtotal: line.subtotal.to_string(),
    }
}

fn order_response(order: OrderView) -> OrderResponse {
    OrderResponse {
        id: order.id,
        user_id: order.user_id,
        status: order.status.to_string(),
        shipping_address: order.shipping_address,
        total: order.total.to_string(),
        created_at: order.created_at.to_rfc3339(),
        lines: order.lines.into_iter().map(line_response).collect(),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Checks the caller's cart out into a new PENDING order. The order insert
/// and the cart clear happen inside a single database transaction.
pub async fn place_order(
    svc: web::Data<AppOrderService>,
    caller: CallerId,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let shipping_address = body.shipping_address.trim().to_string();
    if shipping_address.is_empty() {
        return Err(AppError::BadRequest(
            "Shipping address must not be empty".to_string(),
        ));
    }

    let order = web::block(move || svc.place_order(caller.0, shipping_address))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(order_response(order)))
}

/// GET /orders
pub async fn order_history(
    svc: web::Data<AppOrderService>,
    caller: CallerId,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || svc.order_history(caller.0))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(order_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/{id}
pub async fn get_order(
    svc: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || svc.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(order_response(order)))
}

/// PATCH /orders/{id}
///
/// Administrative status overwrite. Any status may replace any other.
pub async fn update_order_status(
    svc: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = OrderStatus::from_str(&body.status).map_err(AppError::from)?;

    let order = web::block(move || svc.update_order_status(order_id, status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(order_response(order)))
}

/// GET /orders/{id}/items
pub async fn get_order_lines(
    svc: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let lines = web::block(move || svc.order_lines(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderLineResponse> = lines.into_iter().map(line_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/{id}/items/{itemId}
pub async fn get_order_line(
    svc: web::Data<AppOrderService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (order_id, line_id) = path.into_inner();

    let line = web::block(move || svc.order_line(order_id, line_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(line_response(line)))
}
