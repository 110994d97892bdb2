//! Stock batch ledger models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One arrival of stock for a product at a warehouse.
///
/// Batches are consumed oldest-first and never deleted on depletion;
/// a depleted batch stays behind as the cost/price history of that arrival.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockBatch {
    pub id: Uuid,
    pub business_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub batch_number: String,
    /// Quantity originally received
    pub quantity: i32,
    /// Quantity still on hand; never exceeds `quantity`, never negative
    pub remaining: i32,
    pub unit_cost: Decimal,
    /// Inbound freight allocated per unit
    pub shipping_cost_per_unit: Decimal,
    pub selling_price: Decimal,
    pub expiry_date: NaiveDate,
    pub quality_grade: Option<String>,
    pub is_depleted: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only record of a stock mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub business_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i32,
    /// Sale price per unit, only set for sales
    pub unit_price: Option<Decimal>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

/// Kinds of stock mutations recorded in the movement ledger
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Receipt,
    AdjustmentIn,
    AdjustmentOut,
    TransferIn,
    TransferOut,
    Sale,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Receipt => "receipt",
            MovementType::AdjustmentIn => "adjustment_in",
            MovementType::AdjustmentOut => "adjustment_out",
            MovementType::TransferIn => "transfer_in",
            MovementType::TransferOut => "transfer_out",
            MovementType::Sale => "sale",
        }
    }
}

/// Severity of an approaching expiry date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpirySeverity {
    /// 7 days or less
    Critical,
    /// 14 days or less
    Warning,
    Info,
}

impl std::fmt::Display for ExpirySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpirySeverity::Critical => write!(f, "critical"),
            ExpirySeverity::Warning => write!(f, "warning"),
            ExpirySeverity::Info => write!(f, "info"),
        }
    }
}

/// Classify days-until-expiry into an alert severity
pub fn classify_expiry(days_until_expiry: i64) -> ExpirySeverity {
    match days_until_expiry {
        d if d <= 7 => ExpirySeverity::Critical,
        d if d <= 14 => ExpirySeverity::Warning,
        _ => ExpirySeverity::Info,
    }
}

/// Generate a batch number (e.g., "BAT-20240115-4F2A")
pub fn generate_batch_number(date: NaiveDate, suffix: &str) -> String {
    format!("BAT-{}-{}", date.format("%Y%m%d"), suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_expiry_boundaries() {
        assert_eq!(classify_expiry(0), ExpirySeverity::Critical);
        assert_eq!(classify_expiry(7), ExpirySeverity::Critical);
        assert_eq!(classify_expiry(8), ExpirySeverity::Warning);
        assert_eq!(classify_expiry(14), ExpirySeverity::Warning);
        assert_eq!(classify_expiry(15), ExpirySeverity::Info);
        assert_eq!(classify_expiry(365), ExpirySeverity::Info);
    }

    #[test]
    fn test_generate_batch_number() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(generate_batch_number(date, "4f2a"), "BAT-20240115-4F2A");
    }
}
