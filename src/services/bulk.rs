//! Business-portal bulk orders. Purely local arithmetic: no backend call
//! backs this pricing, and submission only flips a flag.

use serde::{Deserialize, Serialize};

use crate::models::TicketType;

/// Discount tiers by total ticket quantity, highest threshold first. The
/// first tier whose minimum is met wins.
pub const BULK_DISCOUNT_TIERS: &[(u32, f64)] = &[(50, 0.20), (20, 0.10)];

pub fn discount_rate(total_quantity: u32) -> f64 {
    BULK_DISCOUNT_TIERS
        .iter()
        .find(|(min, _)| total_quantity >= *min)
        .map(|(_, rate)| *rate)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkLine {
    pub ticket_type: TicketType,
    pub quantity: u32,
    pub unit_price: f64,
}

/// The bulk-order form: per-category quantities, a tiered discount and a
/// submitted flag.
#[derive(Debug, Default)]
pub struct BulkOrderForm {
    lines: Vec<BulkLine>,
    submitted: bool,
}

impl BulkOrderForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[BulkLine] {
        &self.lines
    }

    /// Set the quantity for one ticket category, replacing any previous
    /// line for it. Zero removes the line.
    pub fn set_line(&mut self, ticket_type: TicketType, quantity: u32, unit_price: f64) {
        self.lines.retain(|l| l.ticket_type != ticket_type);
        if quantity > 0 {
            self.lines.push(BulkLine {
                ticket_type,
                quantity,
                unit_price,
            });
        }
    }

    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.unit_price * l.quantity as f64)
            .sum()
    }

    pub fn discount(&self) -> f64 {
        discount_rate(self.total_quantity())
    }

    pub fn total(&self) -> f64 {
        self.subtotal() * (1.0 - self.discount())
    }

    pub fn submit(&mut self) {
        self.submitted = true;
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }
}
