use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    Adult,
    Senior,
    Student,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuyerCategory {
    Resident,
    #[default]
    Tourist,
}

/// One priced line of a quote, one per seat selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub seat_id: String,
    pub ticket_type: TicketType,
    pub amount: f64,
}

/// Server-issued, time-limited price commitment for a set of seat
/// selections. The expiry is server truth; the client only mirrors it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub occurrence_id: i64,
    pub expires_at: DateTime<Utc>,
    pub lines: Vec<QuoteLine>,
    pub total: f64,
}

impl Quote {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        remaining_seconds(self.expires_at, now) == 0
    }
}

/// Whole seconds left until `expires_at`, floored, never negative.
/// Always a fresh subtraction from "now" - never an incremental decrement -
/// so repeated ticks self-correct against clock anomalies.
pub fn remaining_seconds(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires_at - now).num_seconds().max(0)
}
