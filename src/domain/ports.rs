use crate::domain::model::{ConsumptionTracker, NeighborhoodId};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Persistence collaborator for finished neighborhood records.
#[async_trait]
pub trait NeighborhoodStore: Send + Sync {
    /// Stores the neighborhood, then each reading tagged with `captured_on`.
    async fn save(
        &self,
        tracker: &ConsumptionTracker,
        captured_on: NaiveDate,
    ) -> Result<NeighborhoodId>;
}

pub trait StoreSettings: Send + Sync {
    fn database_url(&self) -> &str;
    fn max_connections(&self) -> u32;
}

pub trait SessionSettings: Send + Sync {
    /// Residents per unit typed at the population prompt.
    fn population_unit(&self) -> i64;
    fn persist_enabled(&self) -> bool;
}
