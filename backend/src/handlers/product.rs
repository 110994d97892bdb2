//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::SuccessResponse;
use crate::middleware::CurrentUser;
use crate::services::product::{CreateProductInput, ProductService, UpdateProductInput};
use crate::AppState;
use shared::models::{LabelPayload, Product};

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .create_product(current_user.0.business_id, input)
        .await?;
    Ok(Json(product))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .update_product(current_user.0.business_id, product_id, input)
        .await?;
    Ok(Json(product))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .get_product(current_user.0.business_id, product_id)
        .await?;
    Ok(Json(product))
}

/// List products
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products(current_user.0.business_id).await?;
    Ok(Json(products))
}

/// Soft-delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    if !current_user.0.can_manage() {
        return Err(AppError::Unauthorized("Manager role required".to_string()));
    }

    let service = ProductService::new(state.db);
    service
        .delete_product(current_user.0.business_id, product_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Get render-ready label data for a product
pub async fn get_product_label(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<LabelPayload>> {
    let service = ProductService::new(state.db);
    let label = service
        .label_payload(current_user.0.business_id, product_id)
        .await?;
    Ok(Json(label))
}
