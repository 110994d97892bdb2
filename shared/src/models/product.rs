//! Product catalog and labeling models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub business_id: Uuid,
    /// Unique stock keeping unit within a business (e.g., "WDG-STD-001")
    pub sku: String,
    /// EAN-13 barcode printed on labels
    pub barcode: Option<String>,
    pub name: String,
    pub category: Option<String>,
    /// Sales unit (e.g., "piece", "box", "kg")
    pub unit: String,
    /// Denormalized total remaining stock across all warehouses.
    /// Maintained by stock operations; authoritative count lives in batches.
    pub stock_total: i32,
    pub description: Option<String>,
    pub del_flag: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Render-ready data for a printed product label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelPayload {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub barcode: Option<String>,
    pub unit: String,
    pub selling_price: Option<Decimal>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}
