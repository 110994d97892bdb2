//! HTTP handlers for HR staff endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::SuccessResponse;
use crate::middleware::CurrentUser;
use crate::services::staff::StaffService;
use crate::AppState;
use shared::models::StaffMember;
use shared::wizard::StaffDraft;

/// Create a staff record from an onboarding draft
pub async fn create_staff(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(draft): Json<StaffDraft>,
) -> AppResult<Json<StaffMember>> {
    let service = StaffService::new(state.db);
    let staff = service
        .create_staff(current_user.0.business_id, draft)
        .await?;
    Ok(Json(staff))
}

/// Resubmit the onboarding draft for an existing record
pub async fn update_onboarding(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(staff_id): Path<Uuid>,
    Json(draft): Json<StaffDraft>,
) -> AppResult<Json<StaffMember>> {
    let service = StaffService::new(state.db);
    let staff = service
        .update_onboarding(current_user.0.business_id, staff_id, draft)
        .await?;
    Ok(Json(staff))
}

/// Get a staff member by ID
pub async fn get_staff(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<StaffMember>> {
    let service = StaffService::new(state.db);
    let staff = service
        .get_staff(current_user.0.business_id, staff_id)
        .await?;
    Ok(Json(staff))
}

/// List staff for the business
pub async fn list_staff(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<StaffMember>>> {
    let service = StaffService::new(state.db);
    let staff = service.list_staff(current_user.0.business_id).await?;
    Ok(Json(staff))
}

/// Soft-delete a staff record
pub async fn delete_staff(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    if !current_user.0.can_manage() {
        return Err(AppError::Unauthorized("Manager role required".to_string()));
    }

    let service = StaffService::new(state.db);
    service
        .delete_staff(current_user.0.business_id, staff_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
