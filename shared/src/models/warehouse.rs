//! Warehouse models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::GpsCoordinates;

/// A warehouse operated by a business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: Uuid,
    pub business_id: Uuid,
    /// Short code used in pick lists and labels (e.g., "BKK-01")
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<GpsCoordinates>,
    /// Storage capacity in stock units, if tracked
    pub capacity: Option<i32>,
    pub is_active: bool,
    pub del_flag: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
