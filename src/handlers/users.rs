use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::NewUser;
use crate::errors::AppError;
use crate::AppUserService;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub created_at: String,
}

/// POST /users
///
/// Registers a user. Their empty cart is created in the same transaction.
pub async fn register(
    svc: web::Data<AppUserService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let user = web::block(move || {
        svc.register(NewUser {
            email: body.email,
            display_name: body.display_name,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(UserResponse {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        created_at: user.created_at.to_rfc3339(),
    }))
}
