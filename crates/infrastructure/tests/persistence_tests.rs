//! Integration tests for persistence layer using SQLite databases
//!
//! These tests verify the record store against a migrated schema.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use application::ports::WeatherRecordStore;
use chrono::NaiveDate;
use domain::WeatherRecord;
use infrastructure::{AsyncDatabase, DatabaseConfig, SqliteWeatherRecordStore};

// ============================================================================
// Test Helpers
// ============================================================================

async fn create_test_db() -> AsyncDatabase {
    let db = AsyncDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Failed to run migrations");
    db
}

fn record(city: &str, temperature: f64) -> WeatherRecord {
    let ts = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(8, 30, 15)
        .unwrap();
    WeatherRecord::new(city, temperature, 9.5, 225, ts)
}

// ============================================================================
// Schema Tests
// ============================================================================

mod schema_tests {
    use super::*;

    #[tokio::test]
    async fn weather_table_has_expected_columns() {
        let db = create_test_db().await;

        let columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info('weather') ORDER BY cid")
                .fetch_all(db.pool())
                .await
                .unwrap();

        assert_eq!(
            columns,
            vec![
                "id",
                "city_name",
                "temperature",
                "wind_speed",
                "wind_direction",
                "timestamp"
            ]
        );
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let db = create_test_db().await;
        let store = SqliteWeatherRecordStore::new(db.pool().clone());

        let first = store.save(record("Delhi", 30.0)).await.unwrap();
        sqlx::query("DELETE FROM weather")
            .execute(db.pool())
            .await
            .unwrap();
        let second = store.save(record("Delhi", 31.0)).await.unwrap();

        assert!(second.id.unwrap() > first.id.unwrap());
    }
}

// ============================================================================
// Weather Record Store Tests
// ============================================================================

mod weather_record_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_save_returns_record_with_id() {
        let db = create_test_db().await;
        let store = SqliteWeatherRecordStore::new(db.pool().clone());

        let saved = store.save(record("Chennai", 29.5)).await.expect("save");
        assert!(saved.is_persisted());
        assert_eq!(saved.city_name, "Chennai");
    }

    #[tokio::test]
    async fn test_timestamp_round_trips_exactly() {
        let db = create_test_db().await;
        let store = SqliteWeatherRecordStore::new(db.pool().clone());
        let original = record("Hyderabad", 35.0);

        store.save(original.clone()).await.unwrap();
        let loaded = store.list_recent(1).await.unwrap();

        assert_eq!(loaded[0].timestamp, original.timestamp);
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::file(dir.path().join("weather.db"));

        {
            let db = AsyncDatabase::new(&config).await.unwrap();
            db.migrate().await.unwrap();
            let store = SqliteWeatherRecordStore::new(db.pool().clone());
            store.save(record("Bengaluru", 22.0)).await.unwrap();
            store.save(record("Bengaluru", 23.0)).await.unwrap();
            db.close().await;
        }

        let db = AsyncDatabase::new(&config).await.unwrap();
        db.migrate().await.unwrap();
        let store = SqliteWeatherRecordStore::new(db.pool().clone());
        assert_eq!(store.count().await.unwrap(), 2);

        let next = store.save(record("Bengaluru", 24.0)).await.unwrap();
        assert_eq!(next.id.unwrap().as_i64(), 3);
        db.close().await;
    }

    #[tokio::test]
    async fn test_concurrent_saves_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let db = AsyncDatabase::new(&DatabaseConfig::file(dir.path().join("c.db")))
            .await
            .unwrap();
        db.migrate().await.unwrap();
        let store = SqliteWeatherRecordStore::new(db.pool().clone());

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.save(record("Mumbai", f64::from(i))).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
        db.close().await;
    }
}
