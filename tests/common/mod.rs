use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use ticket_storefront::config::{
    AppConfig, BackendConfig, CircuitBreakerConfig, Config, FeatureFlags, PaymentWidgetConfig,
    QuoteConfig, SeatingWidgetConfig,
};
use ticket_storefront::models::Occurrence;
use ticket_storefront::Storefront;

pub fn test_config(base_url: &str) -> Config {
    Config {
        app: AppConfig {
            environment: "test".to_string(),
            rust_log: "off".to_string(),
        },
        backend: BackendConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        },
        quote: QuoteConfig {
            debounce_ms: 200,
            max_seats_per_order: 6,
        },
        payment: PaymentWidgetConfig {
            public_key: "pk_test".to_string(),
            widget_element_id: "payment-widget".to_string(),
            success_path: "/checkout/success".to_string(),
            fail_path: "/checkout".to_string(),
        },
        seating: SeatingWidgetConfig {
            public_key: "pk_seating".to_string(),
            region: "eu".to_string(),
        },
        circuit_breaker: CircuitBreakerConfig {
            failure_threshold: 5,
            timeout_seconds: 60,
        },
        features: FeatureFlags {
            enable_business_portal: true,
            enable_demo_widget: true,
        },
    }
}

pub fn storefront(base_url: &str) -> Arc<Storefront> {
    Storefront::new(test_config(base_url))
}

pub fn occurrence(id: i64) -> Occurrence {
    serde_json::from_value(occurrence_json(id)).unwrap()
}

pub fn occurrence_json(id: i64) -> Value {
    json!({
        "id": id,
        "startsAt": "2026-09-01T19:30:00Z",
        "language": "en",
        "seatMapRef": "main-hall",
        "availability": [
            {"zone": "vip", "available": 10, "total": 12},
            {"zone": "regular", "available": 40, "total": 48}
        ]
    })
}

pub fn seat_map_json(occurrence_id: i64) -> Value {
    json!({
        "occurrenceId": occurrence_id,
        "rows": 5,
        "seatsPerRow": 6,
        "vipRows": [1],
        "takenSeats": ["R2C1"]
    })
}

pub fn prices_json(occurrence_id: i64) -> Value {
    json!({
        "occurrenceId": occurrence_id,
        "entries": [
            {"zone": "vip", "ticketType": "adult", "buyerCategory": "tourist", "amount": 50.0},
            {"zone": "vip", "ticketType": "senior", "buyerCategory": "tourist", "amount": 40.0},
            {"zone": "vip", "ticketType": "student", "buyerCategory": "tourist", "amount": 35.0},
            {"zone": "regular", "ticketType": "adult", "buyerCategory": "tourist", "amount": 30.0},
            {"zone": "regular", "ticketType": "senior", "buyerCategory": "tourist", "amount": 24.0},
            {"zone": "regular", "ticketType": "student", "buyerCategory": "tourist", "amount": 21.0},
            {"zone": "regular", "ticketType": "child", "buyerCategory": "tourist", "amount": 15.0}
        ]
    })
}

pub fn quote_json(quote_id: &str, occurrence_id: i64, expires_at: DateTime<Utc>, lines: Value, total: f64) -> Value {
    json!({
        "id": quote_id,
        "occurrenceId": occurrence_id,
        "expiresAt": expires_at.to_rfc3339(),
        "lines": lines,
        "total": total
    })
}

pub fn expiry_in(seconds: i64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(seconds)
}

/// Mount the seat map and price endpoints for one occurrence.
pub async fn mount_occurrence_endpoints(server: &MockServer, occurrence_id: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/occurrences/{}/seatmap", occurrence_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(seat_map_json(occurrence_id)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/occurrences/{}/prices", occurrence_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(prices_json(occurrence_id)))
        .mount(server)
        .await;
}

/// Matches quote requests carrying exactly `n` seats.
pub struct SeatCount(pub usize);

impl Match for SeatCount {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|body| body.get("seats").and_then(|s| s.as_array().map(Vec::len)))
            == Some(self.0)
    }
}

/// Requests received for a given path.
pub async fn requests_for(server: &MockServer, needle: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path().contains(needle))
        .collect()
}
