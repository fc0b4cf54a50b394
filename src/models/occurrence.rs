use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::seat::SeatZone;

/// A single date/time/language instance of the ticketed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: i64,
    pub starts_at: DateTime<Utc>,
    pub language: String,
    pub seat_map_ref: String,
    pub availability: Vec<ZoneAvailability>,
}

// Available/total counts per seat class, as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAvailability {
    pub zone: SeatZone,
    pub available: u32,
    pub total: u32,
}

impl Occurrence {
    pub fn is_sold_out(&self) -> bool {
        self.availability.iter().all(|a| a.available == 0)
    }
}
