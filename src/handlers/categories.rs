use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::{CategoryView, NewCategory};
use crate::errors::AppError;
use crate::AppCategoryService;

use super::books::PageParams;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub items: Vec<CategoryResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

fn category_response(category: CategoryView) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        description: category.description,
    }
}

fn new_category(request: CategoryRequest) -> Result<NewCategory, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Category name must not be empty".to_string(),
        ));
    }
    Ok(NewCategory {
        name: request.name,
        description: request.description,
    })
}

/// POST /categories
pub async fn create_category(
    svc: web::Data<AppCategoryService>,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let category = new_category(body.into_inner())?;

    let created = web::block(move || svc.create(category))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(category_response(created)))
}

/// GET /categories/{id}
pub async fn get_category(
    svc: web::Data<AppCategoryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let category_id = path.into_inner();

    let category = web::block(move || svc.get_by_id(category_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(category_response(category)))
}

/// GET /categories
pub async fn list_categories(
    svc: web::Data<AppCategoryService>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = web::block(move || svc.list(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListCategoriesResponse {
        items: result.items.into_iter().map(category_response).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// PUT /categories/{id}
pub async fn update_category(
    svc: web::Data<AppCategoryService>,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let category_id = path.into_inner();
    let category = new_category(body.into_inner())?;

    let updated = web::block(move || svc.update(category_id, category))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(category_response(updated)))
}

/// DELETE /categories/{id}
pub async fn delete_category(
    svc: web::Data<AppCategoryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let category_id = path.into_inner();

    web::block(move || svc.delete(category_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
