//! Single owner of all transient storefront state.
//!
//! The store replaces the original scattered storage keys: every component
//! reads and writes through typed accessors here, and persistence happens
//! as a best-effort side effect of each write. Persistence failures are
//! logged and swallowed - losing a mirror copy must never break the
//! booking flow.

pub mod persist;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::RwLock;
use tracing::warn;

use crate::models::{AddonSelection, AuthState, CheckoutData, OrderRecord, Quote, SeatSelection, User};
use crate::services::demo::{DemoCheckoutData, DemoOrderRecord};
use persist::{Persistence, Scope};

// Session-scoped state, cleared when the order flow completes or resets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSnapshot {
    pub current_quote: Option<Quote>,
    pub seat_selections: Vec<SeatSelection>,
    pub selected_addons: Vec<AddonSelection>,
    pub translation_preference: Option<String>,
    pub checkout_data: Option<CheckoutData>,
    pub order_data: Option<OrderRecord>,
    pub demo_checkout_data: Option<DemoCheckoutData>,
    pub demo_order_data: Option<DemoOrderRecord>,
}

// Longer-lived state: authentication only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalSnapshot {
    pub auth_token: Option<String>,
    pub user_data: Option<User>,
}

pub struct SessionStore {
    session: RwLock<SessionSnapshot>,
    local: RwLock<LocalSnapshot>,
    persistence: Box<dyn Persistence>,
}

impl SessionStore {
    /// Build the store, restoring whatever the backend still holds.
    pub fn new(persistence: Box<dyn Persistence>) -> Self {
        let session = load_scope(persistence.as_ref(), Scope::Session);
        let local = load_scope(persistence.as_ref(), Scope::Local);
        Self {
            session: RwLock::new(session),
            local: RwLock::new(local),
            persistence,
        }
    }

    // --- quote ---

    pub fn quote(&self) -> Option<Quote> {
        self.session.read().unwrap().current_quote.clone()
    }

    pub fn set_quote(&self, quote: Quote) {
        self.update_session(|s| s.current_quote = Some(quote));
    }

    pub fn clear_quote(&self) {
        self.update_session(|s| s.current_quote = None);
    }

    // --- seat selections ---

    pub fn selections(&self) -> Vec<SeatSelection> {
        self.session.read().unwrap().seat_selections.clone()
    }

    pub fn set_selections(&self, selections: Vec<SeatSelection>) {
        self.update_session(|s| s.seat_selections = selections);
    }

    // --- add-ons ---

    pub fn addons(&self) -> Vec<AddonSelection> {
        self.session.read().unwrap().selected_addons.clone()
    }

    pub fn set_addons(&self, addons: Vec<AddonSelection>) {
        self.update_session(|s| s.selected_addons = addons);
    }

    pub fn translation_preference(&self) -> Option<String> {
        self.session.read().unwrap().translation_preference.clone()
    }

    pub fn set_translation_preference(&self, language: Option<String>) {
        self.update_session(|s| s.translation_preference = language);
    }

    // --- checkout / order ---

    pub fn checkout_data(&self) -> Option<CheckoutData> {
        self.session.read().unwrap().checkout_data.clone()
    }

    pub fn set_checkout_data(&self, data: CheckoutData) {
        self.update_session(|s| s.checkout_data = Some(data));
    }

    pub fn order_record(&self) -> Option<OrderRecord> {
        self.session.read().unwrap().order_data.clone()
    }

    pub fn set_order_record(&self, record: OrderRecord) {
        self.update_session(|s| s.order_data = Some(record));
    }

    /// Reset everything belonging to the in-progress order, keeping the
    /// completed order record for the success page.
    pub fn clear_order_flow(&self) {
        self.update_session(|s| {
            s.current_quote = None;
            s.seat_selections = Vec::new();
            s.selected_addons = Vec::new();
            s.checkout_data = None;
        });
    }

    // --- demo flow ---

    pub fn demo_checkout_data(&self) -> Option<DemoCheckoutData> {
        self.session.read().unwrap().demo_checkout_data.clone()
    }

    pub fn set_demo_checkout_data(&self, data: DemoCheckoutData) {
        self.update_session(|s| s.demo_checkout_data = Some(data));
    }

    pub fn demo_order_record(&self) -> Option<DemoOrderRecord> {
        self.session.read().unwrap().demo_order_data.clone()
    }

    pub fn set_demo_order_record(&self, record: DemoOrderRecord) {
        self.update_session(|s| s.demo_order_data = Some(record));
    }

    // --- auth ---

    pub fn auth(&self) -> AuthState {
        let local = self.local.read().unwrap();
        AuthState {
            token: local.auth_token.clone(),
            user: local.user_data.clone(),
        }
    }

    pub fn set_auth(&self, token: String, user: User) {
        self.update_local(|l| {
            l.auth_token = Some(token);
            l.user_data = Some(user);
        });
    }

    pub fn clear_auth(&self) {
        self.update_local(|l| {
            l.auth_token = None;
            l.user_data = None;
        });
    }

    // --- plumbing ---

    fn update_session<F: FnOnce(&mut SessionSnapshot)>(&self, mutate: F) {
        let mut snapshot = self.session.write().unwrap();
        mutate(&mut snapshot);
        self.persist(Scope::Session, &*snapshot);
    }

    fn update_local<F: FnOnce(&mut LocalSnapshot)>(&self, mutate: F) {
        let mut snapshot = self.local.write().unwrap();
        mutate(&mut snapshot);
        self.persist(Scope::Local, &*snapshot);
    }

    fn persist<T: Serialize>(&self, scope: Scope, snapshot: &T) {
        let data = match serde_json::to_string(snapshot) {
            Ok(data) => data,
            Err(e) => {
                warn!("failed to serialize {:?} state: {}", scope, e);
                return;
            }
        };
        if let Err(e) = self.persistence.save(scope, &data) {
            warn!("failed to persist {:?} state: {}", scope, e);
        }
    }
}

fn load_scope<T: DeserializeOwned + Default>(persistence: &dyn Persistence, scope: Scope) -> T {
    match persistence.load(scope) {
        Some(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!("discarding unreadable {:?} state: {}", scope, e);
            T::default()
        }),
        None => T::default(),
    }
}
