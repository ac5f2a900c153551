//! Weather data models
//!
//! Types for the `current_weather=true` response of the Open-Meteo forecast endpoint.

use serde::{Deserialize, Serialize};

/// Current conditions at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Wind direction in degrees, truncated to a whole number
    pub wind_direction: i32,
}

// ============================================================================
// API Response Types (internal)
// ============================================================================

/// Top-level API response from Open-Meteo
///
/// Only the block requested with `current_weather=true` is read.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub current_weather: Option<CurrentWeatherData>,
}

/// The `current_weather` object
///
/// Keys other than these three are ignored whatever their type.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherData {
    pub temperature: f64,
    pub windspeed: f64,
    /// Documented as an integer, accepted as float and truncated
    pub winddirection: f64,
}
