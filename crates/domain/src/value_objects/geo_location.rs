//! WGS84 coordinate pair

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Point on the globe in decimal degrees.
///
/// Deserialization goes through the same range check as [`GeoLocation::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocation> for GeoLocation {
    type Error = DomainError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl GeoLocation {
    /// # Errors
    ///
    /// `DomainError::InvalidCoordinates` when latitude leaves [-90, 90] or
    /// longitude leaves [-180, 180]. NaN never passes.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if LATITUDE_RANGE.contains(&latitude) && LONGITUDE_RANGE.contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(DomainError::invalid_coordinates(latitude, longitude))
        }
    }

    /// Skips the range check; only for compiled-in constants
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_exact_values() {
        let loc = GeoLocation::new(19.07, 72.87).unwrap();
        assert!((loc.latitude() - 19.07).abs() < f64::EPSILON);
        assert!((loc.longitude() - 72.87).abs() < f64::EPSILON);
    }

    #[test]
    fn range_edges_are_inclusive() {
        for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0)] {
            assert!(GeoLocation::new(lat, lon).is_ok(), "{lat}, {lon}");
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        for (lat, lon) in [(91.0, 0.0), (-91.0, 0.0), (0.0, -181.0)] {
            assert!(GeoLocation::new(lat, lon).is_err(), "{lat}, {lon}");
        }
        assert!(matches!(
            GeoLocation::new(0.0, 181.0),
            Err(DomainError::InvalidCoordinates { longitude, .. }) if (longitude - 181.0).abs() < 1e-9
        ));
    }

    #[test]
    fn nan_never_validates() {
        assert!(GeoLocation::new(f64::NAN, 0.0).is_err());
        assert!(GeoLocation::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn displays_as_lat_comma_lon() {
        let loc = GeoLocation::new(28.61, 77.23).unwrap();
        assert_eq!(loc.to_string(), "28.61, 77.23");
    }

    #[test]
    fn json_shape_uses_field_names() {
        let loc = GeoLocation::new(13.08, 80.27).unwrap();
        let value = serde_json::to_value(loc).unwrap();
        assert_eq!(value, serde_json::json!({"latitude": 13.08, "longitude": 80.27}));

        let back: GeoLocation = serde_json::from_value(value).unwrap();
        assert_eq!(back, loc);
    }

    #[test]
    fn deserializing_out_of_range_fails() {
        let result: Result<GeoLocation, _> =
            serde_json::from_str(r#"{"latitude": 120.0, "longitude": 10.0}"#);
        assert!(result.is_err());
    }
}
