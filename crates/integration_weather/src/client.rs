//! Open-Meteo current-conditions client
//!
//! One GET per location against the forecast endpoint with
//! `current_weather=true`; only the `current_weather` block is read.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ApiResponse, CurrentWeather, CurrentWeatherData};

#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    /// No response arrived (DNS, connect, timeout)
    #[error("Open-Meteo unreachable: {0}")]
    Transport(String),

    /// 429 from Open-Meteo
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// 5xx from Open-Meteo
    #[error("Open-Meteo unavailable: HTTP {0}")]
    ServiceUnavailable(u16),

    /// Any other non-2xx status
    #[error("Open-Meteo rejected the request: HTTP {0}")]
    UnexpectedStatus(u16),

    /// Body was not the expected JSON
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Valid JSON without a `current_weather` object
    #[error("Response has no current_weather block")]
    MissingCurrentWeather,

    #[error("Coordinates out of range: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// Open-Meteo endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API root, `/forecast` is appended (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Source of current conditions for a coordinate pair
#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn get_current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentWeather, WeatherError>;
}

/// reqwest-backed Open-Meteo client
#[derive(Debug)]
pub struct OpenMeteoClient {
    http: Client,
    config: WeatherConfig,
}

/// Classify a response status; `None` means the body should be parsed
fn status_error(status: StatusCode) -> Option<WeatherError> {
    if status.is_success() {
        None
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        Some(WeatherError::RateLimitExceeded)
    } else if status.is_server_error() {
        Some(WeatherError::ServiceUnavailable(status.as_u16()))
    } else {
        Some(WeatherError::UnexpectedStatus(status.as_u16()))
    }
}

impl OpenMeteoClient {
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ClientSetup(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Client against the public Open-Meteo API
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WeatherConfig::default())
    }

    #[must_use]
    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// `{base_url}/forecast?latitude=..&longitude=..&current_weather=true`
    #[must_use]
    pub fn build_current_weather_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/forecast?latitude={latitude}&longitude={longitude}&current_weather=true",
            self.config.base_url.trim_end_matches('/'),
        )
    }

    fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        let in_range =
            (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if in_range {
            Ok(())
        } else {
            Err(WeatherError::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }

    #[allow(clippy::cast_possible_truncation)] // wind direction is 0..360
    fn to_current_weather(data: &CurrentWeatherData) -> CurrentWeather {
        CurrentWeather {
            temperature: data.temperature,
            wind_speed: data.windspeed,
            wind_direction: data.winddirection.trunc() as i32,
        }
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn get_current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentWeather, WeatherError> {
        Self::check_coordinates(latitude, longitude)?;

        let url = self.build_current_weather_url(latitude, longitude);
        debug!(%url, "Requesting current weather");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        if let Some(err) = status_error(response.status()) {
            return Err(err);
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Malformed(e.to_string()))?;

        body.current_weather
            .as_ref()
            .map(Self::to_current_weather)
            .ok_or(WeatherError::MissingCurrentWeather)
    }
}
