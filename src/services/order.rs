//! Seat-selection page logic: compose seat choices, ticket types and
//! translation add-ons into a running order, and drive the quote service
//! on every change.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::StorefrontError;
use crate::models::addon::fallback_translation_addons;
use crate::models::quote::BuyerCategory;
use crate::models::seat::parse_seat_id;
use crate::models::{
    Addon, AddonSelection, CheckoutData, Occurrence, PriceMatrix, Seat, SeatMap, SeatSelection,
    TicketType,
};
use crate::services::quote::{QuotePhase, QuoteService};
use crate::session::SessionStore;

/// One page's ticket builder. Owns the selection state for exactly one
/// occurrence at a time; switching occurrence resets everything, because
/// a quote is scoped to a single occurrence.
pub struct TicketBuilder {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    quotes: Arc<QuoteService>,
    max_seats: usize,
    buyer_category: BuyerCategory,
    occurrence: Option<Occurrence>,
    seat_map: Option<SeatMap>,
    prices: Option<PriceMatrix>,
    selections: Vec<SeatSelection>,
    addons: Vec<AddonSelection>,
}

impl TicketBuilder {
    pub fn new(
        api: Arc<ApiClient>,
        session: Arc<SessionStore>,
        quotes: Arc<QuoteService>,
        max_seats: usize,
    ) -> Self {
        Self {
            api,
            session,
            quotes,
            max_seats,
            buyer_category: BuyerCategory::default(),
            occurrence: None,
            seat_map: None,
            prices: None,
            selections: Vec::new(),
            addons: Vec::new(),
        }
    }

    pub fn occurrence(&self) -> Option<&Occurrence> {
        self.occurrence.as_ref()
    }

    pub fn selections(&self) -> &[SeatSelection] {
        &self.selections
    }

    pub fn addon_selections(&self) -> &[AddonSelection] {
        &self.addons
    }

    /// Load an occurrence and its seat map + pricing matrix. Entering a
    /// different occurrence than the current one first clears all
    /// selections and cancels any active quote. A quote persisted for
    /// this occurrence is resumed, along with its mirrored selections.
    pub async fn enter_occurrence(&mut self, occurrence: Occurrence) -> Result<(), StorefrontError> {
        if let Some(current) = &self.occurrence {
            if current.id != occurrence.id {
                self.reset_selections().await;
            }
        }

        let seat_map = self.api.seat_map(occurrence.id).await?;
        let prices = self.api.prices(occurrence.id).await?;

        self.quotes.restore(occurrence.id);
        if self.quotes.phase() == QuotePhase::Active {
            self.selections = self.session.selections();
            self.addons = self.session.addons();
        } else {
            self.selections.clear();
            self.addons.clear();
            self.session.set_selections(Vec::new());
            self.session.set_addons(Vec::new());
        }

        info!(occurrence_id = occurrence.id, "entered occurrence");
        self.occurrence = Some(occurrence);
        self.seat_map = Some(seat_map);
        self.prices = Some(prices);
        Ok(())
    }

    /// Seat grid with statuses for rendering.
    pub fn seats(&self) -> Vec<Seat> {
        let selected: HashSet<String> =
            self.selections.iter().map(|s| s.seat_id.clone()).collect();
        self.seat_map
            .as_ref()
            .map(|map| map.build_seats(&selected))
            .unwrap_or_default()
    }

    /// Pick a seat with a ticket type. The seat cap is enforced before
    /// anything touches the network; a rejected pick schedules no call.
    pub fn select_seat(
        &mut self,
        seat_id: &str,
        ticket_type: TicketType,
    ) -> Result<(), StorefrontError> {
        let occurrence_id = self.occurrence.as_ref().ok_or(StorefrontError::NoOccurrence)?.id;
        let seat_map = self.seat_map.as_ref().ok_or(StorefrontError::NoOccurrence)?;
        let prices = self.prices.as_ref().ok_or(StorefrontError::NoOccurrence)?;

        if self.selections.len() >= self.max_seats {
            return Err(StorefrontError::SeatLimitReached {
                limit: self.max_seats,
            });
        }
        if self.selections.iter().any(|s| s.seat_id == seat_id) {
            return Err(StorefrontError::SeatAlreadySelected {
                seat_id: seat_id.to_string(),
            });
        }

        let (row, number) = parse_seat_id(seat_id).ok_or_else(|| {
            StorefrontError::SeatNotAvailable {
                seat_id: seat_id.to_string(),
            }
        })?;
        if !seat_map.contains(row, number)
            || seat_map.taken_seats.iter().any(|taken| taken == seat_id)
        {
            return Err(StorefrontError::SeatNotAvailable {
                seat_id: seat_id.to_string(),
            });
        }

        let zone = seat_map.zone_of(row);
        let price = prices
            .lookup(zone, ticket_type, self.buyer_category)
            .ok_or(StorefrontError::PriceMissing)?;

        self.selections.push(SeatSelection {
            seat_id: seat_id.to_string(),
            row,
            number,
            zone,
            ticket_type,
            price,
        });
        self.session.set_selections(self.selections.clone());
        self.quotes
            .request_quote(occurrence_id, &self.selections, self.buyer_category);
        Ok(())
    }

    /// Drop a seat. Removing the last one cancels the quote entirely
    /// rather than leaving a zero-item quote behind.
    pub async fn deselect_seat(&mut self, seat_id: &str) -> Result<(), StorefrontError> {
        let occurrence_id = self.occurrence.as_ref().ok_or(StorefrontError::NoOccurrence)?.id;

        let before = self.selections.len();
        self.selections.retain(|s| s.seat_id != seat_id);
        if self.selections.len() == before {
            return Ok(());
        }
        self.addons.retain(|a| a.seat_id != seat_id);
        self.session.set_selections(self.selections.clone());
        self.session.set_addons(self.addons.clone());

        if self.selections.is_empty() {
            self.quotes.cancel().await;
        } else {
            self.quotes
                .request_quote(occurrence_id, &self.selections, self.buyer_category);
        }
        Ok(())
    }

    /// Buyer category changes reprice every line, so the quote is
    /// re-requested.
    pub fn set_buyer_category(&mut self, buyer_category: BuyerCategory) {
        if self.buyer_category == buyer_category {
            return;
        }
        self.buyer_category = buyer_category;
        if let (Some(occurrence), Some(prices)) = (&self.occurrence, &self.prices) {
            for selection in &mut self.selections {
                if let Some(price) =
                    prices.lookup(selection.zone, selection.ticket_type, buyer_category)
                {
                    selection.price = price;
                }
            }
            self.session.set_selections(self.selections.clone());
            if !self.selections.is_empty() {
                self.quotes
                    .request_quote(occurrence.id, &self.selections, buyer_category);
            }
        }
    }

    /// Translation add-on catalog, degrading to the built-in list when
    /// the backend fetch fails.
    pub async fn load_addons(&self) -> Vec<Addon> {
        let occurrence_id = match &self.occurrence {
            Some(occurrence) => occurrence.id,
            None => return Vec::new(),
        };
        match self.api.addons(occurrence_id).await {
            Ok(addons) => addons,
            Err(e) => {
                warn!("addon catalog unavailable, using fallback: {}", e);
                fallback_translation_addons()
            }
        }
    }

    /// Attach a translation add-on to a selected seat, replacing any
    /// previous choice for that seat.
    pub fn attach_addon(&mut self, seat_id: &str, addon: &Addon) -> Result<(), StorefrontError> {
        if !self.selections.iter().any(|s| s.seat_id == seat_id) {
            return Err(StorefrontError::SeatNotSelected {
                seat_id: seat_id.to_string(),
            });
        }
        self.addons.retain(|a| a.seat_id != seat_id);
        self.addons.push(AddonSelection {
            seat_id: seat_id.to_string(),
            addon_id: addon.id.clone(),
            language: addon.language.clone(),
            price: addon.price,
        });
        self.session.set_addons(self.addons.clone());
        self.session
            .set_translation_preference(Some(addon.language.clone()));
        Ok(())
    }

    pub fn detach_addon(&mut self, seat_id: &str) {
        self.addons.retain(|a| a.seat_id != seat_id);
        self.session.set_addons(self.addons.clone());
    }

    /// Running order total. Mirrors the server quote total; the server
    /// value is the one that gets charged.
    pub fn total(&self) -> f64 {
        self.selections.iter().map(|s| s.price).sum()
    }

    /// Freeze the order for the checkout page. Requires an active quote.
    pub fn prepare_checkout(&mut self) -> Result<CheckoutData, StorefrontError> {
        let occurrence_id = self.occurrence.as_ref().ok_or(StorefrontError::NoOccurrence)?.id;
        let snapshot = self.quotes.snapshot();
        let quote = match (snapshot.phase, snapshot.quote) {
            (QuotePhase::Active, Some(quote)) => quote,
            _ => return Err(StorefrontError::NoActiveQuote),
        };

        let data = CheckoutData {
            occurrence_id,
            quote_id: quote.id,
            buyer_category: self.buyer_category,
            selections: self.selections.clone(),
            addons: self.addons.clone(),
            total: quote.total,
        };
        self.session.set_checkout_data(data.clone());
        Ok(data)
    }

    async fn reset_selections(&mut self) {
        self.selections.clear();
        self.addons.clear();
        self.session.set_selections(Vec::new());
        self.session.set_addons(Vec::new());
        self.quotes.cancel().await;
    }
}
