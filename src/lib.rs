pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::ApiClient;
use config::Config;
use error::StorefrontError;
use models::{AuthState, User};
use services::bulk::BulkOrderForm;
use services::checkout::CheckoutService;
use services::demo::DemoFlow;
use services::order::TicketBuilder;
use services::quote::QuoteService;
use session::persist::{MemoryPersistence, Persistence};
use session::SessionStore;

// Shared state for the whole storefront
pub struct Storefront {
    pub config: Config,
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    pub quotes: Arc<QuoteService>,
}

impl Storefront {
    /// Wire the client with in-memory persistence.
    pub fn new(config: Config) -> Arc<Self> {
        Self::with_persistence(config, Box::new(MemoryPersistence::new()))
    }

    /// Wire the client with an injected storage backend. A persisted auth
    /// token is restored onto the API client immediately.
    pub fn with_persistence(config: Config, persistence: Box<dyn Persistence>) -> Arc<Self> {
        let api = Arc::new(ApiClient::from_config(&config));
        let session = Arc::new(SessionStore::new(persistence));

        if let Some(token) = session.auth().token {
            api.set_auth_token(Some(token));
        }

        let quotes = QuoteService::new(api.clone(), session.clone(), &config.quote);
        Arc::new(Self {
            config,
            api,
            session,
            quotes,
        })
    }

    /// Page-scoped builder for the seat-selection flow.
    pub fn ticket_builder(&self) -> TicketBuilder {
        TicketBuilder::new(
            self.api.clone(),
            self.session.clone(),
            self.quotes.clone(),
            self.config.quote.max_seats_per_order,
        )
    }

    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(
            self.api.clone(),
            self.session.clone(),
            self.config.payment.clone(),
        )
    }

    pub fn bulk_order(&self) -> Result<BulkOrderForm, StorefrontError> {
        if !self.config.features.enable_business_portal {
            return Err(StorefrontError::FeatureDisabled);
        }
        Ok(BulkOrderForm::new())
    }

    pub fn demo_flow(&self) -> DemoFlow {
        DemoFlow::new(&self.config, self.session.clone())
    }

    // --- auth ---

    pub fn auth(&self) -> AuthState {
        self.session.auth()
    }

    pub fn login(&self, token: String, user: User) {
        self.api.set_auth_token(Some(token.clone()));
        self.session.set_auth(token, user);
    }

    pub fn logout(&self) {
        self.api.set_auth_token(None);
        self.session.clear_auth();
    }
}

/// Install the global tracing subscriber. Embedders call this once at
/// startup; repeated calls are no-ops.
pub fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}
