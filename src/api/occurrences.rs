use tracing::info;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Addon, Occurrence, PriceMatrix, SeatMap};

impl ApiClient {
    /// Show occurrences for one event.
    pub async fn occurrences(&self, event_id: i64) -> Result<Vec<Occurrence>, ApiError> {
        self.dispatch(self.get(&format!("/api/v3/events/{}/occurrences", event_id)))
            .await
    }

    pub async fn seat_map(&self, occurrence_id: i64) -> Result<SeatMap, ApiError> {
        self.dispatch(self.get(&format!("/api/v3/occurrences/{}/seatmap", occurrence_id)))
            .await
    }

    pub async fn prices(&self, occurrence_id: i64) -> Result<PriceMatrix, ApiError> {
        self.dispatch(self.get(&format!("/api/v3/occurrences/{}/prices", occurrence_id)))
            .await
    }

    /// Translation add-ons offered for one occurrence. Callers degrade to
    /// the built-in fallback catalog when this fails.
    pub async fn addons(&self, occurrence_id: i64) -> Result<Vec<Addon>, ApiError> {
        let addons: Vec<Addon> = self
            .dispatch(self.get(&format!("/api/v3/occurrences/{}/addons", occurrence_id)))
            .await?;
        info!(occurrence_id, count = addons.len(), "loaded addon catalog");
        Ok(addons)
    }
}
