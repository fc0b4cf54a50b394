use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::quote::{BuyerCategory, TicketType};
use crate::models::seat::SeatZone;
use crate::models::AddonSelection;

/// A seat the user has picked, paired with the chosen ticket type and the
/// price resolved from the occurrence pricing matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSelection {
    pub seat_id: String,
    pub row: i32,
    pub number: i32,
    pub zone: SeatZone,
    pub ticket_type: TicketType,
    pub price: f64,
}

// Buyer contact details collected on the checkout page
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDetails {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub surname: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5, max = 20))]
    pub phone: String,
}

// Per-ticket holder details, one per selected seat
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HolderDetails {
    #[validate(length(min = 1))]
    pub seat_id: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
}

/// Everything the checkout page needs, prepared by the ticket builder when
/// the user proceeds from seat selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutData {
    pub occurrence_id: i64,
    pub quote_id: String,
    pub buyer_category: BuyerCategory,
    pub selections: Vec<SeatSelection>,
    pub addons: Vec<AddonSelection>,
    pub total: f64,
}

/// Order summary written before the hosted widget takes over, read back by
/// the success page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub payment_id: String,
    pub occurrence_id: i64,
    pub buyer_email: String,
    pub selections: Vec<SeatSelection>,
    pub addons: Vec<AddonSelection>,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

// Issued ticket, fetched once the payment is confirmed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub seat_id: String,
    pub holder_name: String,
}
