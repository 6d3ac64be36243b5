use crate::domain::model::{ConsumptionTracker, NeighborhoodId, StoredNeighborhood, StoredReading};
use crate::domain::ports::{NeighborhoodStore, StoreSettings};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use std::time::Duration;

/// SQLite-backed neighborhood storage: one row per neighborhood, one per reading.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct NeighborhoodRow {
    id: i64,
    name: String,
    population: i64,
    daily_limit: f64,
}

#[derive(Debug, FromRow)]
struct ReadingRow {
    liters: f64,
    captured_on: NaiveDate,
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl SqliteStore {
    pub async fn connect<S: StoreSettings + ?Sized>(settings: &S) -> Result<Self> {
        let url = settings.database_url();
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        // 記憶體資料庫每條連線都是獨立的，只能保留單一連線
        let pool_options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(settings.max_connections())
        };

        let pool = pool_options.connect_with(options).await?;
        sqlx::raw_sql(include_str!("schema.sql"))
            .execute(&pool)
            .await?;

        tracing::debug!("Connected to {}", url);
        Ok(Self { pool })
    }

    pub async fn neighborhood(&self, id: NeighborhoodId) -> Result<Option<StoredNeighborhood>> {
        let row: Option<NeighborhoodRow> = sqlx::query_as(
            "SELECT id, name, population, daily_limit FROM neighborhoods WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| StoredNeighborhood {
            id: NeighborhoodId(r.id),
            name: r.name,
            population: r.population,
            daily_limit: r.daily_limit,
        }))
    }

    /// Readings of one neighborhood in the order they were recorded.
    pub async fn readings_for(&self, id: NeighborhoodId) -> Result<Vec<StoredReading>> {
        let rows: Vec<ReadingRow> = sqlx::query_as(
            "SELECT liters, captured_on FROM readings WHERE neighborhood_id = ? ORDER BY day",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StoredReading {
                liters: r.liters,
                captured_on: r.captured_on,
            })
            .collect())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl NeighborhoodStore for SqliteStore {
    async fn save(
        &self,
        tracker: &ConsumptionTracker,
        captured_on: NaiveDate,
    ) -> Result<NeighborhoodId> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO neighborhoods (name, population, daily_limit) VALUES (?, ?, ?)",
        )
        .bind(tracker.name())
        .bind(tracker.population() as i64)
        .bind(tracker.daily_limit() as f64)
        .execute(&mut *tx)
        .await?;
        let id = NeighborhoodId(result.last_insert_rowid());

        if !tracker.readings().is_empty() {
            let mut builder = sqlx::QueryBuilder::new(
                "INSERT INTO readings (neighborhood_id, day, liters, captured_on) ",
            );
            builder.push_values(
                tracker.readings().iter().enumerate(),
                |mut b, (index, liters)| {
                    b.push_bind(id.0)
                        .push_bind(index as i64 + 1)
                        .push_bind(*liters)
                        .push_bind(captured_on);
                },
            );
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Saved neighborhood '{}' as #{} with {} readings",
            tracker.name(),
            id,
            tracker.readings().len()
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::HydroError;

    struct MemorySettings;

    impl StoreSettings for MemorySettings {
        fn database_url(&self) -> &str {
            "sqlite::memory:"
        }

        fn max_connections(&self) -> u32 {
            5
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_read_back() {
        let store = SqliteStore::connect(&MemorySettings).await.unwrap();

        let mut tracker = ConsumptionTracker::create("Centro", 10_000).unwrap();
        for value in [1_200_000.0, 900_000.5, 1_500_000.0] {
            tracker.add_reading(value).unwrap();
        }

        let id = store.save(&tracker, date()).await.unwrap();

        let stored = store.neighborhood(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Centro");
        assert_eq!(stored.population, 10_000);
        assert_eq!(stored.daily_limit, 1_100_000.0);

        let readings = store.readings_for(id).await.unwrap();
        let liters: Vec<f64> = readings.iter().map(|r| r.liters).collect();
        assert_eq!(liters, vec![1_200_000.0, 900_000.5, 1_500_000.0]);
        assert!(readings.iter().all(|r| r.captured_on == date()));
    }

    #[tokio::test]
    async fn test_ids_are_distinct_per_neighborhood() {
        let store = SqliteStore::connect(&MemorySettings).await.unwrap();
        let first = ConsumptionTracker::create("Norte", 5).unwrap();
        let second = ConsumptionTracker::create("Sul", 7).unwrap();

        let a = store.save(&first, date()).await.unwrap();
        let b = store.save(&second, date()).await.unwrap();

        assert_ne!(a, b);
        assert!(store.readings_for(a).await.unwrap().is_empty());
        assert!(store.neighborhood(NeighborhoodId(9_999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_pool_reports_persistence_error() {
        let store = SqliteStore::connect(&MemorySettings).await.unwrap();
        store.close().await;

        let tracker = ConsumptionTracker::create("Leste", 3).unwrap();
        let err = store.save(&tracker, date()).await.unwrap_err();
        assert!(matches!(err, HydroError::PersistenceError { .. }));
    }
}
