//! Open-Meteo implementation of `CurrentWeatherPort`

use application::error::ApplicationError;
use application::ports::{CurrentConditions, CurrentWeatherPort};
use async_trait::async_trait;
use domain::{DomainError, value_objects::GeoLocation};
use integration_weather::{
    CurrentWeather, OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError,
};
use tracing::{debug, instrument};

/// Current-conditions port backed by a [`WeatherClient`]
pub struct WeatherAdapter {
    client: Box<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter").finish_non_exhaustive()
    }
}

impl WeatherAdapter {
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client = OpenMeteoClient::new(config).map_err(Self::map_error)?;
        Ok(Self::from_client(client))
    }

    #[must_use]
    pub fn from_client(client: impl WeatherClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Fold client errors into the application taxonomy
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
            WeatherError::InvalidCoordinates {
                latitude,
                longitude,
            } => DomainError::invalid_coordinates(latitude, longitude).into(),
            WeatherError::ClientSetup(_) => ApplicationError::Internal(err.to_string()),
            WeatherError::Transport(_)
            | WeatherError::ServiceUnavailable(_)
            | WeatherError::UnexpectedStatus(_)
            | WeatherError::Malformed(_)
            | WeatherError::MissingCurrentWeather => {
                ApplicationError::ExternalService(err.to_string())
            },
        }
    }

    const fn map_current(current: &CurrentWeather) -> CurrentConditions {
        CurrentConditions {
            temperature: current.temperature,
            wind_speed: current.wind_speed,
            wind_direction: current.wind_direction,
        }
    }
}

#[async_trait]
impl CurrentWeatherPort for WeatherAdapter {
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude()))]
    async fn current_conditions(
        &self,
        location: &GeoLocation,
    ) -> Result<CurrentConditions, ApplicationError> {
        let result = self
            .client
            .get_current_weather(location.latitude(), location.longitude())
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(current) => debug!(
                temperature = current.temperature,
                wind_direction = current.wind_direction,
                "Current weather received"
            ),
            Err(e) => debug!(error = %e, "Current weather request failed"),
        }

        result.map(|c| Self::map_current(&c))
    }
}
