//! Shipment and transport movement models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shipment of goods between two warehouses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: Uuid,
    pub business_id: Uuid,
    pub shipment_number: String,
    pub tracking_number: String,
    pub origin_warehouse_id: Uuid,
    pub destination_warehouse_id: Uuid,
    pub transport_id: Uuid,
    pub items: Vec<ShipmentItem>,
    pub status: ShipmentStatus,
    pub priority: ShipmentPriority,
    pub scheduled_pickup_date: Option<DateTime<Utc>>,
    pub actual_pickup_date: Option<DateTime<Utc>>,
    pub scheduled_delivery_date: Option<DateTime<Utc>>,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub delivery_notes: Option<String>,
    /// Sum of line item totals, fixed at creation time
    pub total_value: Decimal,
    pub current_location: Option<ShipmentLocation>,
    /// Append-only; every location update is kept
    pub location_history: Vec<ShipmentLocation>,
    pub temperature_range: Option<TemperatureRange>,
    pub current_temperature: Option<Decimal>,
    pub is_insured: bool,
    pub insurance_value: Option<Decimal>,
    pub quality_check: Option<QualityCheck>,
    pub del_flag: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line item on a shipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_value: Decimal,
    pub condition: ItemCondition,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// Condition of goods on a line item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    #[default]
    Good,
    Damaged,
    Expired,
}

/// Lifecycle status of a shipment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
    Delayed,
    Damaged,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
            ShipmentStatus::Delayed => "delayed",
            ShipmentStatus::Damaged => "damaged",
        }
    }

    /// Statuses a shipment may move to from this one.
    ///
    /// Delayed and damaged shipments can recover to in-transit or go
    /// straight to delivered. Delivered and cancelled are terminal.
    pub fn allowed_transitions(&self) -> &'static [ShipmentStatus] {
        match self {
            ShipmentStatus::Pending => {
                &[ShipmentStatus::InTransit, ShipmentStatus::Cancelled]
            }
            ShipmentStatus::InTransit => &[
                ShipmentStatus::Delivered,
                ShipmentStatus::Delayed,
                ShipmentStatus::Damaged,
                ShipmentStatus::Cancelled,
            ],
            ShipmentStatus::Delayed | ShipmentStatus::Damaged => &[
                ShipmentStatus::InTransit,
                ShipmentStatus::Delivered,
                ShipmentStatus::Cancelled,
            ],
            ShipmentStatus::Delivered | ShipmentStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: ShipmentStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl std::str::FromStr for ShipmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ShipmentStatus::Pending),
            "in_transit" => Ok(ShipmentStatus::InTransit),
            "delivered" => Ok(ShipmentStatus::Delivered),
            "cancelled" => Ok(ShipmentStatus::Cancelled),
            "delayed" => Ok(ShipmentStatus::Delayed),
            "damaged" => Ok(ShipmentStatus::Damaged),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery priority of a shipment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl ShipmentPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentPriority::Low => "low",
            ShipmentPriority::Normal => "normal",
            ShipmentPriority::High => "high",
            ShipmentPriority::Urgent => "urgent",
        }
    }
}

/// A point on a shipment's route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentLocation {
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Required temperature band for refrigerated goods
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemperatureRange {
    pub min_celsius: Decimal,
    pub max_celsius: Decimal,
}

/// Quality inspection record for a shipment.
/// Re-running the check replaces the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheck {
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
    pub results: String,
    pub issues: Vec<String>,
    pub approved: bool,
}

/// Sum line item totals, normalized to 2 decimal places
pub fn compute_total_value(items: &[ShipmentItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.total_value)
        .sum::<Decimal>()
        .round_dp(2)
}

/// Line item total for a quantity at a unit price, rounded to 2 decimal places
pub fn line_item_total(quantity: i32, unit_price: Decimal) -> Decimal {
    (Decimal::from(quantity) * unit_price).round_dp(2)
}

/// Generate a shipment number (e.g., "SHP-20240115-4F2A9C").
/// Uniqueness rests on the date plus random suffix; collisions are
/// practically impossible but not guaranteed.
pub fn generate_shipment_number(date: NaiveDate, suffix: &str) -> String {
    format!("SHP-{}-{}", date.format("%Y%m%d"), suffix.to_uppercase())
}

/// Generate a tracking number (e.g., "TRK-20240115-9D41B7")
pub fn generate_tracking_number(date: NaiveDate, suffix: &str) -> String {
    format!("TRK-{}-{}", date.format("%Y%m%d"), suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(quantity: i32, unit_price: &str) -> ShipmentItem {
        let price = Decimal::from_str(unit_price).unwrap();
        ShipmentItem {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price: price,
            total_value: line_item_total(quantity, price),
            condition: ItemCondition::Good,
            batch_number: None,
            expiry_date: None,
        }
    }

    #[test]
    fn test_total_value_sums_line_items() {
        let items = vec![item(3, "10.50"), item(2, "4.25")];
        assert_eq!(compute_total_value(&items), Decimal::from_str("40.00").unwrap());
    }

    #[test]
    fn test_line_item_total_rounds_to_cents() {
        // 3 * 0.333 = 0.999, rounds to 1.00
        assert_eq!(
            line_item_total(3, Decimal::from_str("0.333").unwrap()),
            Decimal::from_str("1.00").unwrap()
        );
    }

    #[test]
    fn test_pending_can_only_start_or_cancel() {
        let s = ShipmentStatus::Pending;
        assert!(s.can_transition_to(ShipmentStatus::InTransit));
        assert!(s.can_transition_to(ShipmentStatus::Cancelled));
        assert!(!s.can_transition_to(ShipmentStatus::Delivered));
        assert!(!s.can_transition_to(ShipmentStatus::Delayed));
    }

    #[test]
    fn test_delayed_can_recover() {
        assert!(ShipmentStatus::Delayed.can_transition_to(ShipmentStatus::InTransit));
        assert!(ShipmentStatus::Damaged.can_transition_to(ShipmentStatus::InTransit));
    }

    #[test]
    fn test_terminal_states_allow_nothing() {
        assert!(ShipmentStatus::Delivered.is_terminal());
        assert!(ShipmentStatus::Cancelled.is_terminal());
        assert!(!ShipmentStatus::Delivered.can_transition_to(ShipmentStatus::Pending));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for s in [
            ShipmentStatus::Pending,
            ShipmentStatus::InTransit,
            ShipmentStatus::Delivered,
            ShipmentStatus::Cancelled,
            ShipmentStatus::Delayed,
            ShipmentStatus::Damaged,
        ] {
            assert_eq!(ShipmentStatus::from_str(s.as_str()), Ok(s));
        }
    }
}
