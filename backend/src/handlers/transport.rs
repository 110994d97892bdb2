//! HTTP handlers for transport fleet endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::SuccessResponse;
use crate::middleware::CurrentUser;
use crate::services::transport::{CreateTransportInput, TransportService, UpdateTransportInput};
use crate::AppState;
use shared::models::{Transport, TransportStatus};

/// Register a transport
pub async fn create_transport(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateTransportInput>,
) -> AppResult<Json<Transport>> {
    let service = TransportService::new(state.db);
    let transport = service
        .create_transport(current_user.0.business_id, input)
        .await?;
    Ok(Json(transport))
}

/// Update transport details
pub async fn update_transport(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transport_id): Path<Uuid>,
    Json(input): Json<UpdateTransportInput>,
) -> AppResult<Json<Transport>> {
    let service = TransportService::new(state.db);
    let transport = service
        .update_transport(current_user.0.business_id, transport_id, input)
        .await?;
    Ok(Json(transport))
}

/// Input for a transport status change
#[derive(Debug, Deserialize)]
pub struct TransportStatusInput {
    pub status: TransportStatus,
}

/// Move a transport in or out of maintenance
pub async fn set_transport_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transport_id): Path<Uuid>,
    Json(input): Json<TransportStatusInput>,
) -> AppResult<Json<Transport>> {
    let service = TransportService::new(state.db);
    let transport = service
        .set_status(current_user.0.business_id, transport_id, input.status)
        .await?;
    Ok(Json(transport))
}

/// Get a transport by ID
pub async fn get_transport(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transport_id): Path<Uuid>,
) -> AppResult<Json<Transport>> {
    let service = TransportService::new(state.db);
    let transport = service
        .get_transport(current_user.0.business_id, transport_id)
        .await?;
    Ok(Json(transport))
}

/// Query parameters for transport listing
#[derive(Debug, Deserialize)]
pub struct TransportListQuery {
    pub status: Option<String>,
}

/// List transports, optionally filtered by status
pub async fn list_transports(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<TransportListQuery>,
) -> AppResult<Json<Vec<Transport>>> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(raw.parse::<TransportStatus>().map_err(|_| {
            AppError::Validation {
                field: "status".to_string(),
                message: format!("Unknown transport status '{}'", raw),
            }
        })?),
        None => None,
    };

    let service = TransportService::new(state.db);
    let transports = service
        .list_transports(current_user.0.business_id, status)
        .await?;
    Ok(Json(transports))
}

/// Soft-delete a transport
pub async fn delete_transport(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transport_id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    if !current_user.0.can_manage() {
        return Err(AppError::Unauthorized("Manager role required".to_string()));
    }

    let service = TransportService::new(state.db);
    service
        .delete_transport(current_user.0.business_id, transport_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
