//! Business and organization models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Business types supported by the platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Distributor,
    Manufacturer,
    Retailer,
    /// Combined operations (e.g., manufacturing plus own distribution)
    Integrated,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::Distributor => "distributor",
            BusinessType::Manufacturer => "manufacturer",
            BusinessType::Retailer => "retailer",
            BusinessType::Integrated => "integrated",
        }
    }
}

/// A registered business (tenant) on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub business_type: BusinessType,
    /// Short code used as prefix in generated document numbers
    pub business_code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
