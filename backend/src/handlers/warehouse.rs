//! HTTP handlers for warehouse endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::SuccessResponse;
use crate::middleware::CurrentUser;
use crate::services::warehouse::{CreateWarehouseInput, UpdateWarehouseInput, WarehouseService};
use crate::AppState;
use shared::models::Warehouse;

/// Create a warehouse
pub async fn create_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateWarehouseInput>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service
        .create_warehouse(current_user.0.business_id, input)
        .await?;
    Ok(Json(warehouse))
}

/// Update a warehouse
pub async fn update_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
    Json(input): Json<UpdateWarehouseInput>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service
        .update_warehouse(current_user.0.business_id, warehouse_id, input)
        .await?;
    Ok(Json(warehouse))
}

/// Get a warehouse by ID
pub async fn get_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service
        .get_warehouse(current_user.0.business_id, warehouse_id)
        .await?;
    Ok(Json(warehouse))
}

/// List warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Warehouse>>> {
    let service = WarehouseService::new(state.db);
    let warehouses = service.list_warehouses(current_user.0.business_id).await?;
    Ok(Json(warehouses))
}

/// Soft-delete a warehouse
pub async fn delete_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    if !current_user.0.can_manage() {
        return Err(AppError::Unauthorized("Manager role required".to_string()));
    }

    let service = WarehouseService::new(state.db);
    service
        .delete_warehouse(current_user.0.business_id, warehouse_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
