//! Persistence module
//!
//! sqlx-backed SQLite storage for weather records.

pub mod async_connection;
pub mod error;
pub mod weather_record_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseError};
pub use error::map_sqlx_error;
pub use weather_record_store::SqliteWeatherRecordStore;
