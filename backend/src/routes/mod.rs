//! Route definitions for the Warehouse Operations Management Platform

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - warehouse registry
        .nest("/warehouses", warehouse_routes())
        // Protected routes - transport fleet
        .nest("/transports", transport_routes())
        // Protected routes - stock ledger
        .nest("/stock", stock_routes())
        // Protected routes - shipments
        .nest("/shipments", shipment_routes())
        // Protected routes - analytics
        .nest("/analytics", analytics_routes())
        // Protected routes - HR staff
        .nest("/staff", staff_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/label", get(handlers::get_product_label))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Warehouse registry routes (protected)
fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_warehouses).post(handlers::create_warehouse))
        .route(
            "/:warehouse_id",
            get(handlers::get_warehouse)
                .put(handlers::update_warehouse)
                .delete(handlers::delete_warehouse),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Transport fleet routes (protected)
fn transport_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_transports).post(handlers::create_transport))
        .route(
            "/:transport_id",
            get(handlers::get_transport)
                .put(handlers::update_transport)
                .delete(handlers::delete_transport),
        )
        .route("/:transport_id/status", put(handlers::set_transport_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock ledger routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/receipts", post(handlers::receive_stock))
        .route("/adjustments", post(handlers::adjust_stock))
        .route("/transfers", post(handlers::transfer_stock))
        .route("/sales", post(handlers::record_sale))
        .route("/prices", put(handlers::update_batch_prices))
        .route("/movements", get(handlers::list_movements))
        .route("/warehouses/:warehouse_id", get(handlers::get_warehouse_stock))
        .route(
            "/warehouses/:warehouse_id/products/:product_id",
            delete(handlers::remove_product_from_warehouse),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Shipment routes (protected)
fn shipment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_shipments).post(handlers::create_shipment))
        .route(
            "/:shipment_id",
            get(handlers::get_shipment).delete(handlers::delete_shipment),
        )
        .route("/:shipment_id/status", put(handlers::update_shipment_status))
        .route("/:shipment_id/location", put(handlers::update_shipment_location))
        .route("/:shipment_id/quality-check", post(handlers::perform_quality_check))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Analytics routes (protected)
fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/turnover", get(handlers::get_turnover_report))
        .route("/profitability", get(handlers::get_profitability_report))
        .route("/slow-moving", get(handlers::get_slow_moving_report))
        .route("/expiry-alerts", get(handlers::get_expiry_alerts))
        .route("/dashboard", get(handlers::get_dashboard_metrics))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// HR staff routes (protected)
fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_staff).post(handlers::create_staff))
        .route(
            "/:staff_id",
            get(handlers::get_staff).delete(handlers::delete_staff),
        )
        .route("/:staff_id/onboarding", put(handlers::update_onboarding))
        .route_layer(middleware::from_fn(auth_middleware))
}
