//! HTTP handlers for shipment endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::SuccessResponse;
use crate::middleware::CurrentUser;
use crate::services::shipment::{
    CreateShipmentInput, QualityCheckInput, ShipmentService, UpdateLocationInput,
    UpdateStatusInput,
};
use crate::AppState;
use shared::models::{Shipment, ShipmentStatus};

/// Response for a created shipment
#[derive(Debug, Serialize)]
pub struct CreateShipmentHandlerResponse {
    pub success: bool,
    pub shipment_id: Uuid,
    pub shipment_number: String,
    pub tracking_number: String,
    pub total_value: rust_decimal::Decimal,
}

/// Create a shipment
pub async fn create_shipment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateShipmentInput>,
) -> AppResult<Json<CreateShipmentHandlerResponse>> {
    let service = ShipmentService::new(state.db);
    let created = service
        .create_shipment(current_user.0.business_id, input)
        .await?;
    Ok(Json(CreateShipmentHandlerResponse {
        success: true,
        shipment_id: created.shipment_id,
        shipment_number: created.shipment_number,
        tracking_number: created.tracking_number,
        total_value: created.total_value,
    }))
}

/// Query parameters for shipment listing
#[derive(Debug, Deserialize)]
pub struct ShipmentListQuery {
    pub status: Option<String>,
}

/// List shipments, optionally filtered by status
pub async fn list_shipments(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ShipmentListQuery>,
) -> AppResult<Json<Vec<Shipment>>> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(raw.parse::<ShipmentStatus>().map_err(|_| {
            AppError::Validation {
                field: "status".to_string(),
                message: format!("Unknown shipment status '{}'", raw),
            }
        })?),
        None => None,
    };

    let service = ShipmentService::new(state.db);
    let shipments = service
        .list_shipments(current_user.0.business_id, status)
        .await?;
    Ok(Json(shipments))
}

/// Get a shipment with its line items
pub async fn get_shipment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shipment_id): Path<Uuid>,
) -> AppResult<Json<Shipment>> {
    let service = ShipmentService::new(state.db);
    let shipment = service
        .get_shipment(current_user.0.business_id, shipment_id)
        .await?;
    Ok(Json(shipment))
}

/// Update a shipment's status
pub async fn update_shipment_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shipment_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<SuccessResponse>> {
    let service = ShipmentService::new(state.db);
    service
        .update_status(current_user.0.business_id, shipment_id, input)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Record a tracking location update
pub async fn update_shipment_location(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shipment_id): Path<Uuid>,
    Json(input): Json<UpdateLocationInput>,
) -> AppResult<Json<SuccessResponse>> {
    let service = ShipmentService::new(state.db);
    service
        .update_location(current_user.0.business_id, shipment_id, input)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Record the quality check for a shipment
pub async fn perform_quality_check(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shipment_id): Path<Uuid>,
    Json(input): Json<QualityCheckInput>,
) -> AppResult<Json<SuccessResponse>> {
    let service = ShipmentService::new(state.db);
    service
        .perform_quality_check(current_user.0.business_id, shipment_id, input)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Soft-delete a shipment
pub async fn delete_shipment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(shipment_id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    if !current_user.0.can_manage() {
        return Err(AppError::Unauthorized("Manager role required".to_string()));
    }

    let service = ShipmentService::new(state.db);
    service
        .delete_shipment(current_user.0.business_id, shipment_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
