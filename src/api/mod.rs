//! Typed client for the storefront backend.
//!
//! One method per endpoint, all responses funneled through a single
//! normalization path: 2xx JSON becomes a typed value, 204 becomes an
//! empty success, everything else becomes an [`ApiError::Http`] carrying
//! the parsed domain code. Every dispatch is gated by a circuit breaker so
//! a dead backend is not hammered while the user keeps clicking.

pub mod checkout;
pub mod circuit;
pub mod occurrences;
pub mod quotes;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{error, warn};

use crate::config::Config;
use crate::error::{ApiError, ErrorCode};
use circuit::CircuitBreaker;

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    auth_token: RwLock<Option<String>>,
    breaker: CircuitBreaker,
}

impl ApiClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.backend.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            auth_token: RwLock::new(None),
            breaker: CircuitBreaker::new(
                config.circuit_breaker.failure_threshold,
                config.circuit_breaker.timeout_seconds,
            ),
        }
    }

    /// Bearer token attached to every subsequent request.
    pub fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.write().unwrap() = token;
    }

    pub fn breaker_state(&self) -> circuit::CircuitState {
        self.breaker.state()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn dispatch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(http_error(status.as_u16(), &body))
        }
    }

    /// Send a request whose success carries no body (204).
    pub(crate) async fn dispatch_no_content(
        &self,
        builder: RequestBuilder,
    ) -> Result<(), ApiError> {
        let response = self.execute(builder).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(http_error(status.as_u16(), &body))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        if !self.breaker.can_execute() {
            warn!("circuit breaker is open, blocking backend request");
            return Err(ApiError::CircuitOpen);
        }

        let builder = match self.auth_token.read().unwrap().clone() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        match builder.send().await {
            Ok(response) => {
                self.breaker.record_success();
                Ok(response)
            }
            Err(e) => {
                error!("backend request failed: {:?}", e);
                self.breaker.record_failure();
                Err(ApiError::Network(e))
            }
        }
    }
}

// Structured error body; legacy backends send only a bare message
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    seat: Option<String>,
    message: Option<String>,
}

fn http_error(status: u16, body: &str) -> ApiError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let (code_field, seat, message) = match parsed {
        Some(ErrorBody {
            error: Some(detail),
            message,
        }) => (
            detail.code,
            detail.seat,
            detail.message.or(message).unwrap_or_else(|| body.to_string()),
        ),
        Some(ErrorBody { error: None, message }) => {
            (None, None, message.unwrap_or_else(|| body.to_string()))
        }
        None => (None, None, body.to_string()),
    };

    ApiError::Http {
        status,
        code: ErrorCode::parse(code_field.as_deref(), seat, &message),
        message,
    }
}
