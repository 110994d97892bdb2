//! HTTP handlers for stock ledger endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::SuccessResponse;
use crate::middleware::CurrentUser;
use crate::services::stock::{
    AdjustStockInput, BatchPriceUpdate, ReceiveStockInput, RecordSaleInput, StockService,
    TransferStockInput, WarehouseStockEntry,
};
use crate::AppState;
use shared::models::{StockBatch, StockMovement};

/// Receive a new arrival of stock
pub async fn receive_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ReceiveStockInput>,
) -> AppResult<Json<StockBatch>> {
    let service = StockService::new(state.db);
    let batch = service
        .receive_stock(current_user.0.business_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(batch))
}

/// Adjust stock up or down with a reason
pub async fn adjust_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<SuccessResponse>> {
    let service = StockService::new(state.db);
    service
        .adjust_stock(current_user.0.business_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Response for a completed transfer
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub success: bool,
    pub transferred_batches: Vec<StockBatch>,
}

/// Transfer stock between warehouses
pub async fn transfer_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<TransferStockInput>,
) -> AppResult<Json<TransferResponse>> {
    let service = StockService::new(state.db);
    let transferred_batches = service
        .transfer_stock(current_user.0.business_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(TransferResponse {
        success: true,
        transferred_batches,
    }))
}

/// Record a sale out of a warehouse
pub async fn record_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordSaleInput>,
) -> AppResult<Json<SuccessResponse>> {
    let service = StockService::new(state.db);
    service
        .record_sale(current_user.0.business_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Apply a list of independent batch price updates
pub async fn update_batch_prices(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(updates): Json<Vec<BatchPriceUpdate>>,
) -> AppResult<Json<Vec<StockBatch>>> {
    let service = StockService::new(state.db);
    let updated = service
        .update_batch_prices(current_user.0.business_id, updates)
        .await?;
    Ok(Json(updated))
}

/// Get the stock of a warehouse, grouped per product
pub async fn get_warehouse_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<Vec<WarehouseStockEntry>>> {
    let service = StockService::new(state.db);
    let stock = service
        .get_warehouse_stock(current_user.0.business_id, warehouse_id)
        .await?;
    Ok(Json(stock))
}

/// Hard-delete all batches of a product at a warehouse
pub async fn remove_product_from_warehouse(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((warehouse_id, product_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<SuccessResponse>> {
    if !current_user.0.can_manage() {
        return Err(AppError::Unauthorized("Manager role required".to_string()));
    }

    let service = StockService::new(state.db);
    service
        .remove_product_from_warehouse(
            current_user.0.business_id,
            current_user.0.user_id,
            warehouse_id,
            product_id,
        )
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Query parameters for the movement ledger
#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    pub product_id: Option<Uuid>,
}

/// List stock movements, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockService::new(state.db);
    let movements = service
        .list_movements(current_user.0.business_id, query.product_id)
        .await?;
    Ok(Json(movements))
}
