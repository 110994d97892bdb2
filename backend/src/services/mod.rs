//! Business logic services for the Warehouse Operations Management Platform

pub mod analytics;
pub mod auth;
pub mod product;
pub mod shipment;
pub mod staff;
pub mod stock;
pub mod transport;
pub mod warehouse;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use product::ProductService;
pub use shipment::ShipmentService;
pub use staff::StaffService;
pub use stock::StockService;
pub use transport::TransportService;
pub use warehouse::WarehouseService;
