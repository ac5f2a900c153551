//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Open-Meteo weather
//! adapter and the sqlx SQLite record store. Also owns configuration loading,
//! logging setup and the fixed-rate scheduler.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, CollectorConfig, DatabaseConfig, TelemetryAppConfig, WeatherConfig};
pub use persistence::{AsyncDatabase, AsyncDatabaseError, SqliteWeatherRecordStore};
pub use scheduled_tasks::{
    WEATHER_COLLECTION_TASK, create_weather_collection_task, schedule_weather_collection,
};
pub use scheduler::{SchedulerConfig, SchedulerError, TaskScheduler, TaskStats, TaskStatus};
pub use telemetry::{TelemetryError, init_telemetry};
