use serde::Serialize;
use tracing::info;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::quote::BuyerCategory;
use crate::models::seat::SeatZone;
use crate::models::{Quote, SeatSelection, TicketType};

// Wire request for quote create/refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub buyer_category: BuyerCategory,
    pub seats: Vec<QuoteSeatRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSeatRequest {
    pub row: i32,
    pub number: i32,
    pub zone: SeatZone,
    pub ticket_type: TicketType,
}

impl QuoteRequest {
    pub fn from_selections(selections: &[SeatSelection], buyer_category: BuyerCategory) -> Self {
        Self {
            buyer_category,
            seats: selections
                .iter()
                .map(|s| QuoteSeatRequest {
                    row: s.row,
                    number: s.number,
                    zone: s.zone,
                    ticket_type: s.ticket_type,
                })
                .collect(),
        }
    }
}

impl ApiClient {
    /// First quote for an occurrence. The server opens the seat hold and
    /// issues the expiry.
    pub async fn create_quote(
        &self,
        occurrence_id: i64,
        request: &QuoteRequest,
    ) -> Result<Quote, ApiError> {
        info!(occurrence_id, seats = request.seats.len(), "creating quote");
        self.dispatch(
            self.post(&format!("/api/v3/occurrences/{}/quote", occurrence_id))
                .json(request),
        )
        .await
    }

    /// Update an existing quote in place. Same quote id, so the original
    /// expiry stands rather than resetting on every seat click.
    pub async fn refresh_quote(
        &self,
        quote_id: &str,
        request: &QuoteRequest,
    ) -> Result<Quote, ApiError> {
        info!(quote_id, seats = request.seats.len(), "refreshing quote");
        self.dispatch(self.put(&format!("/api/v3/quotes/{}", quote_id)).json(request))
            .await
    }

    /// Release the quote and its seat hold. 204 on success.
    pub async fn delete_quote(&self, quote_id: &str) -> Result<(), ApiError> {
        self.dispatch_no_content(self.delete(&format!("/api/v3/quotes/{}", quote_id)))
            .await
    }
}
