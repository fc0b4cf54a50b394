//! Quote lifecycle: keep the client-visible price quote and countdown in
//! sync with the server-held seat reservation.
//!
//! The server owns expiry. The countdown here is always a fresh
//! subtraction from the server-issued `expiresAt`, never a local
//! decrement, so client clock drift can shorten a displayed hold but
//! never extend it. Rapid seat clicks are debounced into one network
//! call, and every dispatched call carries a sequence number so a slow
//! stale response can never overwrite newer state.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::quotes::QuoteRequest;
use crate::api::ApiClient;
use crate::config::QuoteConfig;
use crate::error::ApiError;
use crate::models::quote::{remaining_seconds, BuyerCategory};
use crate::models::{Quote, SeatSelection};
use crate::session::SessionStore;

/// Lifecycle phases. There is no terminal error phase: failures surface
/// as a message alongside whichever phase was last reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotePhase {
    Idle,
    Loading,
    Active,
    Expired,
}

/// What the embedding UI renders from.
#[derive(Debug, Clone)]
pub struct QuoteSnapshot {
    pub phase: QuotePhase,
    pub quote: Option<Quote>,
    pub time_remaining: i64,
    pub error: Option<String>,
}

impl QuoteSnapshot {
    fn idle() -> Self {
        Self {
            phase: QuotePhase::Idle,
            quote: None,
            time_remaining: 0,
            error: None,
        }
    }
}

#[derive(Default)]
struct Inner {
    phase: Option<QuotePhase>,
    quote: Option<Quote>,
    error: Option<String>,
    /// Request waiting for the debounce window to close.
    next_request: Option<(i64, QuoteRequest)>,
    pending: Option<JoinHandle<()>>,
    ticker: Option<JoinHandle<()>>,
}

impl Inner {
    fn phase(&self) -> QuotePhase {
        self.phase.unwrap_or(QuotePhase::Idle)
    }
}

pub struct QuoteService {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    debounce: Duration,
    inner: Mutex<Inner>,
    /// Sequence number of the most recently dispatched quote call.
    /// Responses with an older number are discarded.
    issued_seq: AtomicU64,
    state_tx: watch::Sender<QuoteSnapshot>,
    state_rx: watch::Receiver<QuoteSnapshot>,
    /// Handle to ourselves for the spawned timer tasks.
    weak: Weak<QuoteService>,
}

impl QuoteService {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>, config: &QuoteConfig) -> Arc<Self> {
        let (state_tx, state_rx) = watch::channel(QuoteSnapshot::idle());
        Arc::new_cyclic(|weak| Self {
            api,
            session,
            debounce: Duration::from_millis(config.debounce_ms),
            inner: Mutex::new(Inner::default()),
            issued_seq: AtomicU64::new(0),
            state_tx,
            state_rx,
            weak: weak.clone(),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<QuoteSnapshot> {
        self.state_rx.clone()
    }

    pub fn snapshot(&self) -> QuoteSnapshot {
        self.state_rx.borrow().clone()
    }

    pub fn phase(&self) -> QuotePhase {
        self.inner.lock().unwrap().phase()
    }

    /// Schedule a quote create/refresh for the given selections. The call
    /// is debounced: scheduling again inside the window discards the
    /// earlier pending timer, so only the last burst member dispatches.
    pub fn request_quote(
        &self,
        occurrence_id: i64,
        selections: &[SeatSelection],
        buyer_category: BuyerCategory,
    ) {
        let request = QuoteRequest::from_selections(selections, buyer_category);
        {
            let mut inner = self.inner.lock().unwrap();
            if let Some(pending) = inner.pending.take() {
                pending.abort();
            }
            inner.next_request = Some((occurrence_id, request));
            inner.phase = Some(QuotePhase::Loading);
            inner.error = None;
        }
        self.publish();

        let weak = self.weak.clone();
        let debounce = self.debounce;
        let handle = tokio::spawn(async move {
            sleep(debounce).await;
            if let Some(service) = weak.upgrade() {
                service.dispatch_pending().await;
            }
        });
        self.inner.lock().unwrap().pending = Some(handle);
    }

    async fn dispatch_pending(&self) {
        let (occurrence_id, request, existing_id) = {
            let mut inner = self.inner.lock().unwrap();
            let Some((occurrence_id, request)) = inner.next_request.take() else {
                return;
            };
            let existing_id = inner.quote.as_ref().map(|q| q.id.clone());
            (occurrence_id, request, existing_id)
        };

        let seq = self.issued_seq.fetch_add(1, Ordering::SeqCst) + 1;

        // Refresh keeps the quote id, and with it the original expiry. A
        // quote that vanished server-side falls back to a fresh create.
        let result = match existing_id {
            Some(id) => match self.api.refresh_quote(&id, &request).await {
                Err(e) if e.is_quote_not_found() => {
                    debug!(quote_id = %id, "quote vanished server-side, creating anew");
                    self.api.create_quote(occurrence_id, &request).await
                }
                other => other,
            },
            None => self.api.create_quote(occurrence_id, &request).await,
        };

        self.apply_response(seq, result);
    }

    fn apply_response(&self, seq: u64, result: Result<Quote, ApiError>) {
        if seq != self.issued_seq.load(Ordering::SeqCst) {
            debug!(seq, "discarding stale quote response");
            return;
        }

        match result {
            Ok(quote) => {
                self.session.set_quote(quote.clone());
                let start_ticker = {
                    let mut inner = self.inner.lock().unwrap();
                    inner.phase = Some(QuotePhase::Active);
                    inner.error = None;
                    inner.quote = Some(quote);
                    inner.ticker.is_none()
                };
                if start_ticker {
                    self.start_ticker();
                }
            }
            Err(e) if e.is_quote_expired() => {
                info!("server reported quote expiry");
                self.expire();
                return;
            }
            Err(e) => {
                warn!("quote request failed: {}", e);
                let mut inner = self.inner.lock().unwrap();
                inner.error = Some(e.to_string());
                // A transient failure must not cost the user an active hold.
                inner.phase = Some(if inner.quote.is_some() {
                    QuotePhase::Active
                } else {
                    QuotePhase::Idle
                });
            }
        }
        self.publish();
    }

    fn start_ticker(&self) {
        let weak = self.weak.clone();
        let handle = tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(1));
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tick.tick().await; // first tick is immediate
            loop {
                tick.tick().await;
                let Some(service) = weak.upgrade() else { break };
                if service.on_tick() {
                    break;
                }
            }
        });
        self.inner.lock().unwrap().ticker = Some(handle);
    }

    /// One countdown tick. Returns true when the ticker should stop.
    fn on_tick(&self) -> bool {
        let expired = {
            let inner = self.inner.lock().unwrap();
            match &inner.quote {
                Some(quote) => remaining_seconds(quote.expires_at, Utc::now()) == 0,
                None => return true,
            }
        };
        if expired {
            self.expire();
            true
        } else {
            self.publish();
            false
        }
    }

    fn expire(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.phase = Some(QuotePhase::Expired);
            inner.quote = None;
            inner.next_request = None;
            if let Some(ticker) = inner.ticker.take() {
                ticker.abort();
            }
        }
        self.session.clear_quote();
        self.publish();
        info!("quote expired, seat hold released");
    }

    /// Release the quote. The server delete is best-effort: local state,
    /// the persisted copy and all timers are cleared regardless, since
    /// the server-side hold self-expires anyway.
    pub async fn cancel(&self) {
        let quote_id = {
            let mut inner = self.inner.lock().unwrap();
            if let Some(pending) = inner.pending.take() {
                pending.abort();
            }
            if let Some(ticker) = inner.ticker.take() {
                ticker.abort();
            }
            inner.next_request = None;
            inner.phase = Some(QuotePhase::Idle);
            inner.error = None;
            inner.quote.take().map(|q| q.id)
        };
        // Invalidate any response still in flight.
        self.issued_seq.fetch_add(1, Ordering::SeqCst);
        self.session.clear_quote();
        self.publish();

        if let Some(id) = quote_id {
            if let Err(e) = self.api.delete_quote(&id).await {
                warn!(quote_id = %id, "server-side quote delete failed: {}", e);
            }
        }
    }

    /// Resume a persisted quote on startup. No network call: the stored
    /// copy is trusted iff it belongs to the given occurrence and its
    /// expiry is still in the future; anything else is discarded.
    pub fn restore(&self, occurrence_id: i64) {
        match self.session.quote() {
            Some(quote) if quote.occurrence_id == occurrence_id && !quote.is_expired(Utc::now()) => {
                info!(quote_id = %quote.id, "resuming persisted quote");
                let start_ticker = {
                    let mut inner = self.inner.lock().unwrap();
                    inner.phase = Some(QuotePhase::Active);
                    inner.quote = Some(quote);
                    inner.ticker.is_none()
                };
                if start_ticker {
                    self.start_ticker();
                }
            }
            Some(_) => {
                debug!("discarding stale persisted quote");
                self.session.clear_quote();
                self.inner.lock().unwrap().phase = Some(QuotePhase::Idle);
            }
            None => {
                self.inner.lock().unwrap().phase = Some(QuotePhase::Idle);
            }
        }
        self.publish();
    }

    fn publish(&self) {
        let snapshot = {
            let inner = self.inner.lock().unwrap();
            QuoteSnapshot {
                phase: inner.phase(),
                quote: inner.quote.clone(),
                time_remaining: inner
                    .quote
                    .as_ref()
                    .map(|q| remaining_seconds(q.expires_at, Utc::now()))
                    .unwrap_or(0),
                error: inner.error.clone(),
            }
        };
        let _ = self.state_tx.send(snapshot);
    }
}

impl Drop for QuoteService {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(pending) = inner.pending.take() {
                pending.abort();
            }
            if let Some(ticker) = inner.ticker.take() {
                ticker.abort();
            }
        }
    }
}
