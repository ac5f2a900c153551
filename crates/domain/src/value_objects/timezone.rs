//! Timezone value object

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A validated IANA time zone
///
/// Collection timestamps are recorded as wall-clock time in this zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timezone(Tz);

impl Timezone {
    /// Parse an IANA time zone name such as `Asia/Kolkata`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not in the IANA database.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        name.parse::<Tz>()
            .map(Self)
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
    }

    /// Asia/Kolkata, the zone collection timestamps are recorded in by default
    #[must_use]
    pub const fn kolkata() -> Self {
        Self(chrono_tz::Asia::Kolkata)
    }

    /// UTC
    #[must_use]
    pub const fn utc() -> Self {
        Self(chrono_tz::UTC)
    }

    /// Get the IANA name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0.name()
    }

    /// Get the underlying `chrono-tz` zone
    #[must_use]
    pub const fn tz(&self) -> Tz {
        self.0
    }

    /// Wall-clock time in this zone at the given instant
    #[must_use]
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.0).naive_local()
    }

    /// Current wall-clock time in this zone
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.local_time(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::kolkata()
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Timezone {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.as_str().to_string()
    }
}
