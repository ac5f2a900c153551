//! Weather record store using sqlx
//!
//! Append-only persistence for `WeatherRecord` rows in the `weather` table.

use application::{error::ApplicationError, ports::WeatherRecordStore};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use domain::{RecordId, WeatherRecord};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::map_sqlx_error;

/// SQLite-backed weather record store
#[derive(Debug, Clone)]
pub struct SqliteWeatherRecordStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct WeatherRow {
    id: i64,
    city_name: String,
    temperature: f64,
    wind_speed: f64,
    wind_direction: i32,
    timestamp: NaiveDateTime,
}

impl From<WeatherRow> for WeatherRecord {
    fn from(row: WeatherRow) -> Self {
        Self::new(
            row.city_name,
            row.temperature,
            row.wind_speed,
            row.wind_direction,
            row.timestamp,
        )
        .with_id(RecordId::new(row.id))
    }
}

impl SqliteWeatherRecordStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total number of stored records
    pub async fn count(&self) -> Result<u64, ApplicationError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weather")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Most recently inserted records, newest first
    #[instrument(skip(self))]
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<WeatherRecord>, ApplicationError> {
        let rows: Vec<WeatherRow> = sqlx::query_as(
            r"
            SELECT id, city_name, temperature, wind_speed, wind_direction, timestamp
            FROM weather
            ORDER BY id DESC
            LIMIT $1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(WeatherRecord::from).collect())
    }
}

#[async_trait]
impl WeatherRecordStore for SqliteWeatherRecordStore {
    #[instrument(skip(self, record), fields(city = %record.city_name))]
    async fn save(&self, record: WeatherRecord) -> Result<WeatherRecord, ApplicationError> {
        let result = sqlx::query(
            r"
            INSERT INTO weather (city_name, temperature, wind_speed, wind_direction, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&record.city_name)
        .bind(record.temperature)
        .bind(record.wind_speed)
        .bind(record.wind_direction)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let id = RecordId::new(result.last_insert_rowid());
        debug!(record_id = %id, "Weather record saved");
        Ok(record.with_id(id))
    }
}
