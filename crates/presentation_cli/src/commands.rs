//! Subcommand implementations
//!
//! Each command builds only the pieces it needs from [`AppConfig`]. The
//! long-running `run` command takes its shutdown trigger as a future so it can
//! be driven by a signal in the binary and by a timer in tests.

use std::{future::Future, sync::Arc, time::Duration};

use application::{error::ApplicationError, services::WeatherCollector};
use domain::{CityTable, WeatherRecord};
use infrastructure::{
    AppConfig, AsyncDatabase, AsyncDatabaseError, DatabaseConfig, SchedulerConfig,
    SchedulerError, SqliteWeatherRecordStore, TaskScheduler, TelemetryError,
    WEATHER_COLLECTION_TASK, WeatherAdapter, schedule_weather_collection,
};
use thiserror::Error;
use tracing::{info, warn};

/// Upper bound on waiting for in-flight passes after shutdown is requested
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);
const DRAIN_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Database error: {0}")]
    Database(#[from] AsyncDatabaseError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Logging setup failed: {0}")]
    Telemetry(#[from] TelemetryError),
}

/// Open the record database, applying migrations when configured
pub async fn open_database(config: &DatabaseConfig) -> Result<AsyncDatabase, CliError> {
    let db = AsyncDatabase::new(config).await?;
    if config.run_migrations {
        db.migrate().await?;
    }
    Ok(db)
}

/// Wire the Open-Meteo adapter and the SQLite store into a collector
pub fn build_collector(
    config: &AppConfig,
    db: &AsyncDatabase,
) -> Result<Arc<WeatherCollector>, CliError> {
    let weather = WeatherAdapter::with_config(config.weather.clone())?;
    let store = SqliteWeatherRecordStore::new(db.pool().clone());

    let collector = WeatherCollector::new(Arc::new(weather), Arc::new(store))
        .with_timezone(config.timezone()?);
    Ok(Arc::new(collector))
}

/// Run the fixed-rate collector until `shutdown` resolves
///
/// Stops the scheduler, then waits (bounded) for passes already in flight
/// before closing the database.
pub async fn run_until(
    config: &AppConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<(), CliError> {
    let db = open_database(&config.database).await?;
    let collector = build_collector(config, &db)?;

    let scheduler = TaskScheduler::new(SchedulerConfig { auto_start: true }).await?;
    schedule_weather_collection(&scheduler, collector, &config.collector).await?;

    info!(
        interval_secs = config.collector.interval_secs,
        cities = CityTable::default().len(),
        "Weather collector running"
    );

    shutdown.await;
    info!("Shutdown requested");

    scheduler.stop().await?;
    drain(&scheduler).await;
    db.close().await;

    info!("Weather collector stopped");
    Ok(())
}

async fn drain(scheduler: &TaskScheduler) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    loop {
        let in_flight = scheduler
            .get_task_stats(WEATHER_COLLECTION_TASK)
            .map_or(0, |stats| stats.in_flight);
        if in_flight == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            warn!(in_flight, "Giving up on in-flight collection passes");
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

/// What a single `collect` pass left in the database
#[derive(Debug)]
pub struct CollectOutcome {
    /// Rows written by this pass, newest first
    pub stored: Vec<WeatherRecord>,
    /// Rows in the table after the pass
    pub total: u64,
}

/// Run a single collection pass and report the rows it stored
pub async fn run_once(config: &AppConfig) -> Result<CollectOutcome, CliError> {
    let db = open_database(&config.database).await?;
    let collector = build_collector(config, &db)?;
    let store = SqliteWeatherRecordStore::new(db.pool().clone());

    let before = store.count().await?;
    collector.collect_all().await;
    let total = store.count().await?;

    let written = u32::try_from(total.saturating_sub(before)).unwrap_or(u32::MAX);
    let stored = if written == 0 {
        Vec::new()
    } else {
        store.list_recent(written).await?
    };

    db.close().await;
    Ok(CollectOutcome { stored, total })
}

/// One line per record: id, city, temperature, wind speed and direction, time
pub fn render_records(records: &[WeatherRecord]) -> String {
    records
        .iter()
        .map(|r| {
            let id = r.id.map_or_else(|| "-".to_string(), |id| id.to_string());
            format!(
                "{id:>6}  {:<10}  {:>6.1} C  {:>6.1} km/h  {:>3} deg  {}\n",
                r.city_name, r.temperature, r.wind_speed, r.wind_direction, r.timestamp
            )
        })
        .collect()
}

/// Apply migrations regardless of `database.run_migrations`
pub async fn run_migrate(config: &DatabaseConfig) -> Result<(), CliError> {
    let db = AsyncDatabase::new(config).await?;
    db.migrate().await?;
    db.close().await;
    Ok(())
}

/// Plain-text listing of the city table, one city per line
pub fn render_city_table(cities: &CityTable) -> String {
    let width = cities.names().map(str::len).max().unwrap_or(0);
    cities
        .into_iter()
        .map(|city| {
            format!(
                "{:<width$}  {:>8.2}  {:>8.2}\n",
                city.name(),
                city.latitude(),
                city.longitude(),
            )
        })
        .collect()
}
