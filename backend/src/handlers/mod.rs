//! HTTP handlers for the Warehouse Operations Management Platform

pub mod analytics;
pub mod auth;
pub mod health;
pub mod product;
pub mod shipment;
pub mod staff;
pub mod stock;
pub mod transport;
pub mod warehouse;

pub use analytics::*;
pub use auth::*;
pub use health::*;
pub use product::*;
pub use shipment::*;
pub use staff::*;
pub use stock::*;
pub use transport::*;
pub use warehouse::*;

/// Bare acknowledgement for mutations that return no entity
#[derive(Debug, serde::Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
