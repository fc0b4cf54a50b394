//! Demo booking flow backed by the third-party interactive seating-chart
//! widget. The widget owns seat rendering and its hold-token protocol;
//! this side only hands it a session and records what came back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::config::{Config, SeatingWidgetConfig};
use crate::error::StorefrontError;
use crate::session::SessionStore;

/// What the embedder needs to boot the vendor widget.
#[derive(Debug, Clone)]
pub struct WidgetBootstrap {
    pub public_key: String,
    pub region: String,
    pub event_key: String,
}

// Selection captured from the widget before checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoCheckoutData {
    pub event_key: String,
    pub hold_token: String,
    pub objects: Vec<String>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoOrderRecord {
    pub order_id: String,
    pub event_key: String,
    pub objects: Vec<String>,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

pub struct DemoFlow {
    seating: SeatingWidgetConfig,
    session: Arc<SessionStore>,
    enabled: bool,
}

impl DemoFlow {
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Self {
        Self {
            seating: config.seating.clone(),
            session,
            enabled: config.features.enable_demo_widget,
        }
    }

    /// Start the demo flow. A missing event key is irrecoverable: the
    /// caller redirects back to the occurrence list.
    pub fn begin(&self, event_key: Option<&str>) -> Result<WidgetBootstrap, StorefrontError> {
        if !self.enabled {
            return Err(StorefrontError::FeatureDisabled);
        }
        let event_key = event_key
            .filter(|key| !key.is_empty())
            .ok_or(StorefrontError::MissingEventKey)?;

        Ok(WidgetBootstrap {
            public_key: self.seating.public_key.clone(),
            region: self.seating.region.clone(),
            event_key: event_key.to_string(),
        })
    }

    /// Record what the widget's callbacks reported, for the demo
    /// checkout page.
    pub fn capture_selection(&self, data: DemoCheckoutData) {
        info!(objects = data.objects.len(), "captured demo selection");
        self.session.set_demo_checkout_data(data);
    }

    pub fn checkout_data(&self) -> Result<DemoCheckoutData, StorefrontError> {
        self.session
            .demo_checkout_data()
            .ok_or(StorefrontError::MissingCheckoutData)
    }

    /// Turn the captured selection into a demo order record for the
    /// success page.
    pub fn complete(&self) -> Result<DemoOrderRecord, StorefrontError> {
        let data = self.checkout_data()?;
        let record = DemoOrderRecord {
            order_id: Uuid::new_v4().to_string(),
            event_key: data.event_key,
            objects: data.objects,
            total: data.total,
            created_at: Utc::now(),
        };
        self.session.set_demo_order_record(record.clone());
        Ok(record)
    }

    pub fn order_record(&self) -> Option<DemoOrderRecord> {
        self.session.demo_order_record()
    }
}
