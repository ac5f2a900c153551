//! Current weather port
//!
//! Defines the interface for fetching current conditions at a location.

use async_trait::async_trait;
use domain::value_objects::GeoLocation;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Current conditions as reported by the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Wind speed as reported by the provider (km/h for Open-Meteo)
    pub wind_speed: f64,
    /// Wind direction in whole degrees
    pub wind_direction: i32,
}

/// Port for current weather lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CurrentWeatherPort: Send + Sync {
    /// Fetch current conditions for a location
    async fn current_conditions(
        &self,
        location: &GeoLocation,
    ) -> Result<CurrentConditions, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn CurrentWeatherPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn CurrentWeatherPort>();
    }
}
