//! Domain models for the Warehouse Operations Management Platform

mod business;
mod product;
mod shipment;
mod staff;
mod stock;
mod transport;
mod user;
mod warehouse;

pub use business::*;
pub use product::*;
pub use shipment::*;
pub use staff::*;
pub use stock::*;
pub use transport::*;
pub use user::*;
pub use warehouse::*;
