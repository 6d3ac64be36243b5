use crate::adapters::csv_report::ReportRow;
use crate::config::batch_config::NeighborhoodEntry;
use crate::domain::model::ConsumptionTracker;
use crate::domain::ports::NeighborhoodStore;
use crate::utils::error::{HydroError, Result};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub imported: usize,
    pub rejected: usize,
    pub persisted: usize,
    pub persistence_failures: usize,
    #[serde(skip)]
    pub rows: Vec<ReportRow>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        self.rejected > 0 || self.persistence_failures > 0
    }
}

/// Classifies and stores neighborhoods read from a batch file. A bad entry is rejected on
/// its own; the remaining entries still go through.
pub struct BatchImporter<S> {
    store: Option<S>,
    population_unit: i64,
    captured_on: NaiveDate,
}

impl<S: NeighborhoodStore> BatchImporter<S> {
    /// `store` is `None` for a dry run.
    pub fn new(store: Option<S>, population_unit: i64, captured_on: NaiveDate) -> Self {
        Self {
            store,
            population_unit,
            captured_on,
        }
    }

    pub async fn run(&self, entries: &[NeighborhoodEntry]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for entry in entries {
            let (tracker, rows) = match self.build(entry) {
                Ok(built) => built,
                Err(e) => {
                    summary.rejected += 1;
                    tracing::warn!("⚠️ Rejected neighborhood '{}': {}", entry.name, e);
                    continue;
                }
            };
            summary.imported += 1;
            summary.rows.extend(rows);

            tracing::info!(
                "{}: {} readings, total {:.2} L, daily limit {} L",
                tracker.name(),
                tracker.readings().len(),
                tracker.total_consumption(),
                tracker.daily_limit()
            );

            let Some(store) = &self.store else {
                continue;
            };
            match store.save(&tracker, self.captured_on).await {
                Ok(id) => {
                    summary.persisted += 1;
                    tracing::debug!("'{}' stored as #{}", tracker.name(), id);
                }
                Err(e) => {
                    summary.persistence_failures += 1;
                    tracing::error!("❌ Failed to save '{}': {}", tracker.name(), e);
                }
            }
        }

        summary
    }

    fn build(&self, entry: &NeighborhoodEntry) -> Result<(ConsumptionTracker, Vec<ReportRow>)> {
        let population = entry
            .population
            .checked_mul(self.population_unit)
            .ok_or_else(|| {
                HydroError::invalid_argument("population", entry.population, "Population is too large")
            })?;
        let mut tracker = ConsumptionTracker::create(entry.name.as_str(), population)?;

        let mut rows = Vec::with_capacity(entry.readings.len());
        for (index, liters) in entry.readings.iter().enumerate() {
            let evaluation = tracker.record(*liters)?;
            tracing::debug!(
                "{} day {}: {}% -> {}",
                tracker.name(),
                index + 1,
                evaluation.excess_percent,
                evaluation.label
            );
            rows.push(ReportRow::new(tracker.name(), index + 1, &evaluation));
        }

        Ok((tracker, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ClassificationLabel, NeighborhoodId};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStore {
        saved: Arc<Mutex<Vec<(String, Vec<f64>)>>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl NeighborhoodStore for MockStore {
        async fn save(
            &self,
            tracker: &ConsumptionTracker,
            _captured_on: NaiveDate,
        ) -> Result<NeighborhoodId> {
            if self.fail_on.as_deref() == Some(tracker.name()) {
                return Err(HydroError::persistence("disk full"));
            }
            let mut saved = self.saved.lock().await;
            saved.push((tracker.name().to_string(), tracker.readings().to_vec()));
            Ok(NeighborhoodId(saved.len() as i64))
        }
    }

    fn entry(name: &str, population: i64, readings: &[f64]) -> NeighborhoodEntry {
        NeighborhoodEntry {
            name: name.to_string(),
            population,
            readings: readings.to_vec(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn test_bad_entries_are_rejected_individually() {
        let store = MockStore::default();
        let importer = BatchImporter::new(Some(store.clone()), 1, date());

        let summary = importer
            .run(&[
                entry("Centro", 10, &[1100.0, 1926.0]),
                entry("Vazio", 0, &[10.0]),
                entry("Negativo", 5, &[100.0, -1.0]),
                entry("Norte", 20, &[]),
            ])
            .await;

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.persisted, 2);
        assert!(summary.has_failures());

        let labels: Vec<ClassificationLabel> = summary.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![ClassificationLabel::Ideal, ClassificationLabel::Alert]);

        let saved = store.saved.lock().await;
        assert_eq!(saved[0], ("Centro".to_string(), vec![1100.0, 1926.0]));
        assert_eq!(saved[1].0, "Norte");
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_rows() {
        let store = MockStore {
            fail_on: Some("Sul".to_string()),
            ..MockStore::default()
        };
        let importer = BatchImporter::new(Some(store), 1000, date());

        let summary = importer.run(&[entry("Sul", 1, &[137_500.0])]).await;

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.persisted, 0);
        assert_eq!(summary.persistence_failures, 1);
        assert_eq!(summary.rows[0].label, ClassificationLabel::High);
        assert_eq!(summary.rows[0].excess_percent, 25.0);
    }

    #[tokio::test]
    async fn test_dry_run_skips_store() {
        let importer: BatchImporter<MockStore> = BatchImporter::new(None, 1, date());
        let summary = importer.run(&[entry("Leste", 3, &[50.0])]).await;

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.persisted, 0);
        assert!(!summary.has_failures());
    }
}
