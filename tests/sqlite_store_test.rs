use anyhow::Result;
use chrono::NaiveDate;
use hydro_control::domain::ports::{NeighborhoodStore, StoreSettings};
use hydro_control::{ConsumptionTracker, SqliteStore};
use tempfile::TempDir;

struct FileDb {
    url: String,
}

impl StoreSettings for FileDb {
    fn database_url(&self) -> &str {
        &self.url
    }

    fn max_connections(&self) -> u32 {
        2
    }
}

/// 關閉後重新開啟，資料仍在
#[tokio::test]
async fn test_data_survives_reconnect() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("hydro.db");
    let settings = FileDb {
        url: format!("sqlite://{}", db_path.display()),
    };
    let captured_on = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();

    let mut tracker = ConsumptionTracker::create("Jardim", 4_000)?;
    for liters in [400_000.0, 520_250.75, 300_000.0] {
        tracker.record(liters)?;
    }

    let store = SqliteStore::connect(&settings).await?;
    let id = store.save(&tracker, captured_on).await?;
    store.close().await;

    assert!(db_path.exists());

    let reopened = SqliteStore::connect(&settings).await?;
    let stored = reopened.neighborhood(id).await?.expect("neighborhood row");
    assert_eq!(stored.name, "Jardim");
    assert_eq!(stored.population, 4_000);
    assert_eq!(stored.daily_limit, 440_000.0);

    let readings = reopened.readings_for(id).await?;
    assert_eq!(readings.len(), 3);
    assert_eq!(readings[1].liters, 520_250.75);
    assert!(readings.iter().all(|r| r.captured_on == captured_on));
    Ok(())
}

#[test]
fn test_store_from_blocking_context() {
    let stored = tokio_test::block_on(async {
        let settings = FileDb {
            url: "sqlite::memory:".to_string(),
        };
        let store = SqliteStore::connect(&settings).await.unwrap();
        let tracker = ConsumptionTracker::create("Praia", 1).unwrap();
        let id = store
            .save(&tracker, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();
        store.neighborhood(id).await.unwrap()
    });
    assert_eq!(stored.map(|n| n.daily_limit), Some(110.0));
}
