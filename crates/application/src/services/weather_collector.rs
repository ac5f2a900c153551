//! Weather collector service
//!
//! Polls current conditions for every configured city and appends one
//! weather record per successful fetch. Failures are isolated per city.

use std::{fmt, sync::Arc};

use domain::{City, CityTable, Timezone, WeatherRecord};
use tracing::{debug, error, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{CurrentWeatherPort, WeatherRecordStore},
};

/// Service that runs collection passes over a city table
pub struct WeatherCollector {
    weather_port: Arc<dyn CurrentWeatherPort>,
    record_store: Arc<dyn WeatherRecordStore>,
    cities: CityTable,
    timezone: Timezone,
}

impl fmt::Debug for WeatherCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherCollector")
            .field("cities", &self.cities.len())
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl WeatherCollector {
    /// Create a collector over the compiled-in city table, stamping records
    /// in Asia/Kolkata
    #[must_use]
    pub fn new(
        weather_port: Arc<dyn CurrentWeatherPort>,
        record_store: Arc<dyn WeatherRecordStore>,
    ) -> Self {
        Self {
            weather_port,
            record_store,
            cities: CityTable::default(),
            timezone: Timezone::default(),
        }
    }

    /// Replace the city table
    #[must_use]
    pub fn with_cities(mut self, cities: CityTable) -> Self {
        self.cities = cities;
        self
    }

    /// Set the zone used for record timestamps
    #[must_use]
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    #[must_use]
    pub const fn cities(&self) -> &CityTable {
        &self.cities
    }

    #[must_use]
    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Run one collection pass over every city, in table order
    ///
    /// Per-city failures are logged and swallowed; nothing is retried.
    #[instrument(skip(self), fields(cities = self.cities.len()))]
    pub async fn collect_all(&self) {
        let mut stored = 0usize;
        let mut failed = 0usize;

        for city in &self.cities {
            match self.collect_city(city).await {
                Ok(record) => {
                    stored += 1;
                    info!(
                        city = %record.city_name,
                        temperature = record.temperature,
                        record_id = ?record.id,
                        "Stored weather for {}: {}°C",
                        record.city_name,
                        record.temperature
                    );
                },
                Err(e) => {
                    failed += 1;
                    error!(city = %city.name(), error = %e, "Failed to collect weather for {}", city.name());
                },
            }
        }

        info!(stored, failed, "Weather collection pass finished");
    }

    /// Fetch, build and store the record for a single city
    ///
    /// Returns the stored record carrying its assigned id.
    #[instrument(skip(self, city), fields(city = %city.name(), lat = city.latitude(), lon = city.longitude()))]
    pub async fn collect_city(&self, city: &City) -> Result<WeatherRecord, ApplicationError> {
        let conditions = self
            .weather_port
            .current_conditions(&city.location())
            .await?;

        let record = WeatherRecord::new(
            city.name(),
            conditions.temperature,
            conditions.wind_speed,
            conditions.wind_direction,
            self.timezone.now(),
        );
        debug!(temperature = record.temperature, "Fetched current conditions");

        self.record_store.save(record).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use domain::{GeoLocation, RecordId};

    use super::*;
    use crate::ports::{CurrentConditions, MockCurrentWeatherPort, MockWeatherRecordStore};

    fn conditions(temperature: f64) -> CurrentConditions {
        CurrentConditions {
            temperature,
            wind_speed: 12.1,
            wind_direction: 190,
        }
    }

    /// Store mock that assigns increasing ids and records every save
    fn recording_store(saved: Arc<Mutex<Vec<WeatherRecord>>>) -> MockWeatherRecordStore {
        let mut store = MockWeatherRecordStore::new();
        store.expect_save().returning(move |record| {
            let mut saved = saved.lock().unwrap();
            let id = i64::try_from(saved.len()).unwrap() + 1;
            let record = record.with_id(RecordId::new(id));
            saved.push(record.clone());
            Ok(record)
        });
        store
    }

    fn two_cities() -> CityTable {
        CityTable::new(vec![
            City::new("A", GeoLocation::new(10.0, 20.0).unwrap()),
            City::new("B", GeoLocation::new(30.0, 40.0).unwrap()),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn collect_city_builds_record_from_conditions() {
        let mut port = MockCurrentWeatherPort::new();
        port.expect_current_conditions()
            .withf(|loc| (loc.latitude() - 19.07).abs() < 1e-9 && (loc.longitude() - 72.87).abs() < 1e-9)
            .times(1)
            .returning(|_| Ok(conditions(28.4)));

        let saved = Arc::new(Mutex::new(Vec::new()));
        let collector = WeatherCollector::new(Arc::new(port), Arc::new(recording_store(saved.clone())));
        let mumbai = collector.cities().get("Mumbai").unwrap().clone();

        let before = Timezone::kolkata().now();
        let record = collector.collect_city(&mumbai).await.unwrap();
        let after = Timezone::kolkata().now();

        assert_eq!(record.city_name, "Mumbai");
        assert!((record.temperature - 28.4).abs() < f64::EPSILON);
        assert!((record.wind_speed - 12.1).abs() < f64::EPSILON);
        assert_eq!(record.wind_direction, 190);
        assert_eq!(record.id, Some(RecordId::new(1)));
        assert!(record.timestamp >= before && record.timestamp <= after);
        assert_eq!(saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn collect_city_propagates_fetch_error_without_saving() {
        let mut port = MockCurrentWeatherPort::new();
        port.expect_current_conditions()
            .returning(|_| Err(ApplicationError::ExternalService("boom".into())));
        let mut store = MockWeatherRecordStore::new();
        store.expect_save().never();

        let collector = WeatherCollector::new(Arc::new(port), Arc::new(store));
        let city = collector.cities().get("Delhi").unwrap().clone();

        let result = collector.collect_city(&city).await;
        assert!(matches!(result, Err(ApplicationError::ExternalService(_))));
    }

    #[tokio::test]
    async fn collect_all_stores_one_record_per_city_in_order() {
        let mut port = MockCurrentWeatherPort::new();
        port.expect_current_conditions()
            .times(5)
            .returning(|_| Ok(conditions(25.0)));

        let saved = Arc::new(Mutex::new(Vec::new()));
        let collector = WeatherCollector::new(Arc::new(port), Arc::new(recording_store(saved.clone())));

        collector.collect_all().await;

        let saved = saved.lock().unwrap();
        let names: Vec<&str> = saved.iter().map(|r| r.city_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Mumbai", "Delhi", "Chennai", "Hyderabad", "Bengaluru"]
        );
    }

    #[tokio::test]
    async fn failure_for_one_city_does_not_block_the_next() {
        let mut port = MockCurrentWeatherPort::new();
        port.expect_current_conditions()
            .withf(|loc| (loc.latitude() - 10.0).abs() < 1e-9)
            .times(1)
            .returning(|_| Err(ApplicationError::ExternalService("malformed JSON".into())));
        port.expect_current_conditions()
            .withf(|loc| (loc.latitude() - 30.0).abs() < 1e-9)
            .times(1)
            .returning(|_| Ok(conditions(31.5)));

        let saved = Arc::new(Mutex::new(Vec::new()));
        let collector = WeatherCollector::new(Arc::new(port), Arc::new(recording_store(saved.clone())))
            .with_cities(two_cities());

        collector.collect_all().await;

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].city_name, "B");
        assert!((saved[0].temperature - 31.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn storage_failure_is_swallowed_per_city() {
        let mut port = MockCurrentWeatherPort::new();
        port.expect_current_conditions()
            .times(2)
            .returning(|_| Ok(conditions(20.0)));

        let mut store = MockWeatherRecordStore::new();
        let mut calls = 0;
        store.expect_save().times(2).returning(move |record| {
            calls += 1;
            if calls == 1 {
                Err(ApplicationError::Storage("database is locked".into()))
            } else {
                Ok(record.with_id(RecordId::new(1)))
            }
        });

        let collector =
            WeatherCollector::new(Arc::new(port), Arc::new(store)).with_cities(two_cities());

        collector.collect_all().await;
    }

    #[tokio::test]
    async fn consecutive_passes_produce_independent_records() {
        let mut port = MockCurrentWeatherPort::new();
        port.expect_current_conditions()
            .times(4)
            .returning(|_| Ok(conditions(22.0)));

        let saved = Arc::new(Mutex::new(Vec::new()));
        let collector = WeatherCollector::new(Arc::new(port), Arc::new(recording_store(saved.clone())))
            .with_cities(two_cities());

        collector.collect_all().await;
        collector.collect_all().await;

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 4);
        assert_eq!(saved.iter().filter(|r| r.city_name == "A").count(), 2);
        assert_eq!(saved.iter().filter(|r| r.city_name == "B").count(), 2);

        let ids: Vec<i64> = saved.iter().filter_map(|r| r.id).map(|id| id.as_i64()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn timestamps_use_configured_zone() {
        let mut port = MockCurrentWeatherPort::new();
        port.expect_current_conditions()
            .returning(|_| Ok(conditions(5.0)));
        let saved = Arc::new(Mutex::new(Vec::new()));

        let collector = WeatherCollector::new(Arc::new(port), Arc::new(recording_store(saved.clone())))
            .with_cities(two_cities())
            .with_timezone(Timezone::utc());
        assert_eq!(collector.timezone(), Timezone::utc());

        let before = chrono::Utc::now().naive_utc();
        collector.collect_all().await;
        let after = chrono::Utc::now().naive_utc();

        for record in saved.lock().unwrap().iter() {
            assert!(record.timestamp >= before && record.timestamp <= after);
        }
    }

    #[test]
    fn debug_hides_ports() {
        let collector = WeatherCollector::new(
            Arc::new(MockCurrentWeatherPort::new()),
            Arc::new(MockWeatherRecordStore::new()),
        );
        let debug = format!("{collector:?}");
        assert!(debug.contains("WeatherCollector"));
        assert!(debug.contains("cities: 5"));
    }
}
