//! HTTP handlers for analytics and reporting endpoints
//!
//! Report endpoints return JSON by default and CSV when `?format=csv`
//! is requested.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::analytics::{AnalyticsService, DashboardMetrics, ExpiryAlert};
use crate::AppState;

/// Query parameters shared by the report endpoints
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Override the configured window/cutoff in days
    pub days: Option<i64>,
    /// "json" (default) or "csv"
    pub format: Option<String>,
}

fn csv_response(filename: &str, csv: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response()
}

/// Turnover per product over the trailing window
pub async fn get_turnover_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let window = query
        .days
        .unwrap_or(state.config.analytics.turnover_window_days);
    let service = AnalyticsService::new(state.db);
    let data = service
        .turnover_report(current_user.0.business_id, window)
        .await?;

    if query.format.as_deref() == Some("csv") {
        let csv = AnalyticsService::export_to_csv(&data)?;
        Ok(csv_response("turnover.csv", csv))
    } else {
        Ok(Json(data).into_response())
    }
}

/// Margin per open batch
pub async fn get_profitability_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let service = AnalyticsService::new(state.db);
    let data = service
        .profitability_report(current_user.0.business_id)
        .await?;

    if query.format.as_deref() == Some("csv") {
        let csv = AnalyticsService::export_to_csv(&data)?;
        Ok(csv_response("profitability.csv", csv))
    } else {
        Ok(Json(data).into_response())
    }
}

/// Batches older than the cutoff that still hold stock
pub async fn get_slow_moving_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let cutoff = query
        .days
        .unwrap_or(state.config.analytics.slow_moving_cutoff_days);
    let service = AnalyticsService::new(state.db);
    let data = service
        .slow_moving_report(current_user.0.business_id, cutoff)
        .await?;

    if query.format.as_deref() == Some("csv") {
        let csv = AnalyticsService::export_to_csv(&data)?;
        Ok(csv_response("slow_moving.csv", csv))
    } else {
        Ok(Json(data).into_response())
    }
}

/// Batches expiring within the look-ahead window
pub async fn get_expiry_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<ExpiryAlert>>> {
    let window = query
        .days
        .unwrap_or(state.config.analytics.expiry_window_days);
    let service = AnalyticsService::new(state.db);
    let alerts = service
        .expiry_alerts(current_user.0.business_id, window)
        .await?;
    Ok(Json(alerts))
}

/// Headline counts for the dashboard landing page
pub async fn get_dashboard_metrics(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    let service = AnalyticsService::new(state.db);
    let metrics = service.dashboard_metrics(current_user.0.business_id).await?;
    Ok(Json(metrics))
}
