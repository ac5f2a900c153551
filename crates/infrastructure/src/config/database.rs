//! `[database]` section

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::default_true;

const DEFAULT_URL: &str = "sqlite:weather.db";
const MEMORY_URL: &str = "sqlite::memory:";

/// Where weather rows go and how the pool is sized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx URL; `sqlite::memory:` keeps everything in RAM
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Apply embedded migrations when the pool opens
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Switch file databases to WAL journaling; ignored in memory
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

fn default_url() -> String {
    DEFAULT_URL.to_owned()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            run_migrations: true,
            wal_mode: true,
        }
    }
}

impl DatabaseConfig {
    /// Single-connection in-memory database.
    ///
    /// Each SQLite memory connection is a separate database, so the pool
    /// must not grow past one.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: MEMORY_URL.to_owned(),
            max_connections: 1,
            wal_mode: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            url: format!("sqlite:{}", path.as_ref().display()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}
