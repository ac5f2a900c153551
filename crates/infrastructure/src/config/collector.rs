//! Collection schedule configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Settings for the periodic collection job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Seconds between collection passes (default: 300)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// IANA zone used for record timestamps (default: Asia/Kolkata)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Run one pass as soon as the scheduler starts (default: true)
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

const fn default_interval_secs() -> u64 {
    300
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timezone: default_timezone(),
            run_on_startup: true,
        }
    }
}
