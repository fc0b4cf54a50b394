use serde::Deserialize;
use std::env;

// Top-level configuration - container for every concern of the client
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub quote: QuoteConfig,
    pub payment: PaymentWidgetConfig,
    pub seating: SeatingWidgetConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub features: FeatureFlags,
}

// Application-wide settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
}

// Backend REST API settings
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Quote lifecycle settings
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
    /// Burst window for collapsing rapid seat clicks into one quote call.
    pub debounce_ms: u64,
    pub max_seats_per_order: usize,
}

// Hosted payment widget settings
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentWidgetConfig {
    pub public_key: String,
    pub widget_element_id: String,
    pub success_path: String,
    pub fail_path: String,
}

// Third-party seating chart widget (demo flow) settings
#[derive(Debug, Clone, Deserialize)]
pub struct SeatingWidgetConfig {
    pub public_key: String,
    pub region: String,
}

// Circuit breaker guarding the backend client
#[derive(Debug, Clone, Deserialize)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub timeout_seconds: u64,
}

// Feature flags for the optional surfaces
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_business_portal: bool,
    pub enable_demo_widget: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Config {
            app: AppConfig {
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "ticket_storefront=debug".to_string()),
            },
            backend: BackendConfig {
                base_url: env::var("BACKEND_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
                timeout_seconds: env::var("BACKEND_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("BACKEND_TIMEOUT_SECONDS must be a valid number"),
            },
            quote: QuoteConfig {
                debounce_ms: env::var("QUOTE_DEBOUNCE_MS")
                    .unwrap_or_else(|_| "200".to_string())
                    .parse()
                    .expect("QUOTE_DEBOUNCE_MS must be a valid number"),
                max_seats_per_order: env::var("MAX_SEATS_PER_ORDER")
                    .unwrap_or_else(|_| "6".to_string())
                    .parse()
                    .expect("MAX_SEATS_PER_ORDER must be a valid number"),
            },
            payment: PaymentWidgetConfig {
                public_key: env::var("PAYMENT_PUBLIC_KEY")
                    .unwrap_or_else(|_| "pk_test_placeholder".to_string()),
                widget_element_id: env::var("PAYMENT_WIDGET_ELEMENT_ID")
                    .unwrap_or_else(|_| "payment-widget".to_string()),
                success_path: env::var("PAYMENT_SUCCESS_PATH")
                    .unwrap_or_else(|_| "/checkout/success".to_string()),
                fail_path: env::var("PAYMENT_FAIL_PATH")
                    .unwrap_or_else(|_| "/checkout".to_string()),
            },
            seating: SeatingWidgetConfig {
                public_key: env::var("SEATING_PUBLIC_KEY").unwrap_or_default(),
                region: env::var("SEATING_REGION").unwrap_or_else(|_| "eu".to_string()),
            },
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold: env::var("CIRCUIT_BREAKER_FAILURE_THRESHOLD")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .expect("CIRCUIT_BREAKER_FAILURE_THRESHOLD must be a valid number"),
                timeout_seconds: env::var("CIRCUIT_BREAKER_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .expect("CIRCUIT_BREAKER_TIMEOUT_SECONDS must be a valid number"),
            },
            features: FeatureFlags {
                enable_business_portal: env::var("ENABLE_BUSINESS_PORTAL")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .expect("ENABLE_BUSINESS_PORTAL must be true or false"),
                enable_demo_widget: env::var("ENABLE_DEMO_WIDGET")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .expect("ENABLE_DEMO_WIDGET must be true or false"),
            },
        }
    }
}
