//! SQLite pool for the weather record database
//!
//! One sqlx pool shared by every store. The schema lives in the workspace
//! `migrations/` directory and is embedded at compile time.

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;

#[derive(Debug, thiserror::Error)]
pub enum AsyncDatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// How long a writer waits on a locked database before failing the insert
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection settings derived from the configuration
///
/// WAL is only meaningful for file databases; in-memory URLs keep the
/// default rollback journal.
fn connect_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .busy_timeout(BUSY_TIMEOUT);

    if config.wal_mode && !config.is_in_memory() {
        return Ok(options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal));
    }
    Ok(options)
}

/// Handle to the record database
#[derive(Debug, Clone)]
pub struct AsyncDatabase {
    pool: SqlitePool,
}

impl AsyncDatabase {
    /// Open (creating if missing) the database named by `config.url`
    #[instrument(skip_all, fields(url = %config.url))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AsyncDatabaseError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .connect_with(connect_options(config)?)
            .await?;

        info!(
            max_connections = config.max_connections,
            wal = config.wal_mode && !config.is_in_memory(),
            "Weather database opened"
        );
        Ok(Self { pool })
    }

    /// Single-connection in-memory database
    pub async fn in_memory() -> Result<Self, AsyncDatabaseError> {
        Self::new(&DatabaseConfig::in_memory()).await
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply pending migrations; already-applied ones are skipped
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<(), AsyncDatabaseError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Weather schema up to date");
        Ok(())
    }

    /// Close every pooled connection, waiting for checked-out ones
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Weather database closed");
    }
}
