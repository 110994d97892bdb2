//! Transport fleet models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transport vehicle or carrier contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    pub id: Uuid,
    pub business_id: Uuid,
    pub vehicle_number: String,
    pub carrier_name: Option<String>,
    pub transport_type: TransportType,
    pub capacity_kg: Option<Decimal>,
    pub status: TransportStatus,
    pub del_flag: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mode of transport
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    Truck,
    Van,
    Rail,
    Air,
    Sea,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Truck => "truck",
            TransportType::Van => "van",
            TransportType::Rail => "rail",
            TransportType::Air => "air",
            TransportType::Sea => "sea",
        }
    }
}

/// Availability status of a transport.
/// Shipment creation moves it to `InUse`; delivery or cancellation
/// releases it back to `Available`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportStatus {
    Available,
    InUse,
    Maintenance,
}

impl TransportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportStatus::Available => "available",
            TransportStatus::InUse => "in_use",
            TransportStatus::Maintenance => "maintenance",
        }
    }
}

impl std::str::FromStr for TransportStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(TransportStatus::Available),
            "in_use" => Ok(TransportStatus::InUse),
            "maintenance" => Ok(TransportStatus::Maintenance),
            _ => Err(()),
        }
    }
}
