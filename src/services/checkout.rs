//! Checkout: collect buyer and holder details, obtain a payment client
//! secret from the backend, and hand it to the hosted payment widget. The
//! widget's callbacks are the only asynchronous boundary; there is no
//! retry logic here - a failed payment simply re-surfaces for the user.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::api::checkout::CheckoutRequest;
use crate::api::ApiClient;
use crate::config::PaymentWidgetConfig;
use crate::error::StorefrontError;
use crate::models::{BuyerDetails, CheckoutData, HolderDetails, OrderRecord, Ticket};
use crate::session::SessionStore;

/// Everything the embedder needs to mount the hosted payment widget.
#[derive(Debug, Clone)]
pub struct PaymentHandoff {
    pub payment_id: String,
    pub client_secret: String,
    pub public_key: String,
    pub widget_element_id: String,
    pub success_path: String,
    pub fail_path: String,
}

pub struct CheckoutService {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    payment: PaymentWidgetConfig,
}

impl CheckoutService {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>, payment: PaymentWidgetConfig) -> Self {
        Self { api, session, payment }
    }

    /// The prepared order this page renders. Landing here without one is
    /// irrecoverable; the caller sends the user back to seat selection.
    pub fn begin(&self) -> Result<CheckoutData, StorefrontError> {
        self.session
            .checkout_data()
            .ok_or(StorefrontError::MissingCheckoutData)
    }

    /// Validate details, create the payment intent, and return the widget
    /// handoff. The order record is written before the widget takes over
    /// so the success page can read it back.
    pub async fn submit(
        &self,
        buyer: &BuyerDetails,
        holders: &[HolderDetails],
    ) -> Result<PaymentHandoff, StorefrontError> {
        let data = self.begin()?;

        buyer.validate()?;
        for holder in holders {
            holder.validate()?;
        }
        if holders.len() != data.selections.len()
            || !data
                .selections
                .iter()
                .all(|s| holders.iter().any(|h| h.seat_id == s.seat_id))
        {
            return Err(StorefrontError::HolderMismatch);
        }

        let addon_total: f64 = data.addons.iter().map(|a| a.price).sum();
        let request = CheckoutRequest {
            quote_id: data.quote_id.clone(),
            occurrence_id: data.occurrence_id,
            buyer: buyer.clone(),
            holders: holders.to_vec(),
            addons: data.addons.clone(),
            amount_cents: to_cents(data.total + addon_total),
        };

        let intent = self.api.checkout(&request).await?;
        info!(payment_id = %intent.payment_id, "payment intent created");

        self.session.set_order_record(OrderRecord {
            payment_id: intent.payment_id.clone(),
            occurrence_id: data.occurrence_id,
            buyer_email: buyer.email.clone(),
            selections: data.selections,
            addons: data.addons,
            total: data.total + addon_total,
            created_at: Utc::now(),
        });

        Ok(PaymentHandoff {
            payment_id: intent.payment_id,
            client_secret: intent.client_secret,
            public_key: self.payment.public_key.clone(),
            widget_element_id: self.payment.widget_element_id.clone(),
            success_path: self.payment.success_path.clone(),
            fail_path: self.payment.fail_path.clone(),
        })
    }

    /// Success-page landing: read the order record written before the
    /// widget handoff, fetch the issued tickets, and reset the order
    /// flow. The record itself stays for rendering the confirmation.
    pub async fn complete_success(
        &self,
        payment_id: &str,
    ) -> Result<(OrderRecord, Vec<Ticket>), StorefrontError> {
        let record = self
            .session
            .order_record()
            .filter(|r| r.payment_id == payment_id)
            .ok_or_else(|| StorefrontError::MissingOrderRecord {
                payment_id: payment_id.to_string(),
            })?;

        let tickets = self.api.tickets(payment_id).await?;
        self.session.clear_order_flow();
        info!(payment_id, tickets = tickets.len(), "order completed");
        Ok((record, tickets))
    }
}

/// Gateway amounts are integer minor units.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
