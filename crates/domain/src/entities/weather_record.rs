//! WeatherRecord entity - One observation of current conditions for a city

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::value_objects::RecordId;

/// Current conditions observed for a city at collection time
///
/// Records are append-only: the collector builds one per successful fetch,
/// hands it to storage, and never reads it back.
///
/// Records do not implement `PartialEq`. Two records are the same entity only
/// when they share a storage-assigned id (see [`Self::same_entity`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Storage-assigned key, `None` until persisted
    pub id: Option<RecordId>,
    /// Name of the configured city the reading belongs to
    pub city_name: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub wind_speed: f64,
    /// Degrees
    pub wind_direction: i32,
    /// Wall-clock time in the collector's time zone
    pub timestamp: NaiveDateTime,
}

impl WeatherRecord {
    /// Create a new, not yet persisted record
    #[must_use]
    pub fn new(
        city_name: impl Into<String>,
        temperature: f64,
        wind_speed: f64,
        wind_direction: i32,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            city_name: city_name.into(),
            temperature,
            wind_speed,
            wind_direction,
            timestamp,
        }
    }

    /// Attach the storage-assigned id
    #[must_use]
    pub const fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub const fn id(&self) -> Option<RecordId> {
        self.id
    }

    #[must_use]
    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    #[must_use]
    pub const fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    #[must_use]
    pub const fn wind_direction(&self) -> i32 {
        self.wind_direction
    }

    #[must_use]
    pub const fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Whether storage has assigned an id
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Identity comparison by surrogate key
    ///
    /// Unpersisted records are never the same entity as anything, including
    /// themselves.
    #[must_use]
    pub fn same_entity(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
