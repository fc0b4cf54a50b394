use serde::{Deserialize, Serialize};

use crate::models::quote::{BuyerCategory, TicketType};
use crate::models::seat::SeatZone;

// One cell of the backend pricing matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    pub zone: SeatZone,
    pub ticket_type: TicketType,
    pub buyer_category: BuyerCategory,
    pub amount: f64,
}

/// Pricing matrix for one occurrence, keyed by zone x ticket type x buyer
/// category. The backend owns the adjusted amounts; the client only looks
/// them up and never multiplies discounts itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceMatrix {
    pub occurrence_id: i64,
    pub entries: Vec<PriceEntry>,
}

impl PriceMatrix {
    pub fn lookup(
        &self,
        zone: SeatZone,
        ticket_type: TicketType,
        buyer_category: BuyerCategory,
    ) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| {
                e.zone == zone && e.ticket_type == ticket_type && e.buyer_category == buyer_category
            })
            .map(|e| e.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_on_all_three_keys() {
        let matrix = PriceMatrix {
            occurrence_id: 1,
            entries: vec![
                PriceEntry {
                    zone: SeatZone::Vip,
                    ticket_type: TicketType::Senior,
                    buyer_category: BuyerCategory::Tourist,
                    amount: 40.0,
                },
                PriceEntry {
                    zone: SeatZone::Vip,
                    ticket_type: TicketType::Adult,
                    buyer_category: BuyerCategory::Tourist,
                    amount: 50.0,
                },
            ],
        };

        assert_eq!(
            matrix.lookup(SeatZone::Vip, TicketType::Senior, BuyerCategory::Tourist),
            Some(40.0)
        );
        assert_eq!(
            matrix.lookup(SeatZone::Regular, TicketType::Senior, BuyerCategory::Tourist),
            None
        );
    }
}
