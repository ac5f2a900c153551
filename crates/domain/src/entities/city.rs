//! City table - The fixed set of cities the collector polls

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::GeoLocation;

/// A named city and its coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    name: String,
    location: GeoLocation,
}

impl City {
    /// Create a city entry
    #[must_use]
    pub fn new(name: impl Into<String>, location: GeoLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn location(&self) -> GeoLocation {
        self.location
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.latitude()
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.longitude()
    }
}

/// Compiled-in cities, in polling order
const DEFAULT_CITIES: [(&str, f64, f64); 5] = [
    ("Mumbai", 19.07, 72.87),
    ("Delhi", 28.61, 77.23),
    ("Chennai", 13.08, 80.27),
    ("Hyderabad", 17.38, 78.48),
    ("Bengaluru", 12.97, 77.59),
];

/// Immutable, ordered mapping from city name to coordinates
///
/// Names are unique keys. Iteration yields cities in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct CityTable {
    cities: Vec<City>,
}

impl CityTable {
    /// Build a table, rejecting duplicate or empty names
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` on an empty or repeated name.
    pub fn new(cities: impl IntoIterator<Item = City>) -> Result<Self, DomainError> {
        let mut table: Vec<City> = Vec::new();
        for city in cities {
            if city.name().trim().is_empty() {
                return Err(DomainError::ValidationError(
                    "city name cannot be empty".to_string(),
                ));
            }
            if table.iter().any(|c| c.name() == city.name()) {
                return Err(DomainError::ValidationError(format!(
                    "duplicate city name: {}",
                    city.name()
                )));
            }
            table.push(city);
        }
        Ok(Self { cities: table })
    }

    /// Look up a city by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, City> {
        self.cities.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// City names in table order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(City::name)
    }
}

impl Default for CityTable {
    fn default() -> Self {
        Self {
            cities: DEFAULT_CITIES
                .iter()
                .map(|&(name, lat, lon)| City::new(name, GeoLocation::new_unchecked(lat, lon)))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CityTable {
    type Item = &'a City;
    type IntoIter = std::slice::Iter<'a, City>;

    fn into_iter(self) -> Self::IntoIter {
        self.cities.iter()
    }
}
