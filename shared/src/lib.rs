//! Shared types and models for the Warehouse Operations Management Platform
//!
//! This crate contains types shared between the backend, frontend (via WASM),
//! and other components of the system.

pub mod models;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod wizard;

pub use models::*;
pub use pricing::*;
pub use types::*;
pub use validation::*;
