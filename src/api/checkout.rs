use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{AddonSelection, BuyerDetails, HolderDetails, Ticket};

// Wire request for checkout
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub quote_id: String,
    pub occurrence_id: i64,
    pub buyer: BuyerDetails,
    pub holders: Vec<HolderDetails>,
    pub addons: Vec<AddonSelection>,
    /// Integer minor units, the gateway never sees floats.
    pub amount_cents: i64,
}

/// Payment intent handed back by the backend; the client secret goes
/// straight to the hosted widget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub payment_id: String,
    pub client_secret: String,
    pub amount_cents: i64,
}

impl ApiClient {
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<PaymentIntent, ApiError> {
        info!(
            quote_id = %request.quote_id,
            amount_cents = request.amount_cents,
            "starting checkout"
        );
        self.dispatch(self.post("/api/v3/checkout").json(request)).await
    }

    /// Tickets issued for a confirmed payment.
    pub async fn tickets(&self, payment_id: &str) -> Result<Vec<Ticket>, ApiError> {
        self.dispatch(self.get(&format!("/api/v3/payments/{}/tickets", payment_id)))
            .await
    }
}
