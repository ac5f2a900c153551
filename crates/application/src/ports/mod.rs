//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod current_weather_port;
mod weather_record_store;

#[cfg(test)]
pub use current_weather_port::MockCurrentWeatherPort;
pub use current_weather_port::{CurrentConditions, CurrentWeatherPort};
#[cfg(test)]
pub use weather_record_store::MockWeatherRecordStore;
pub use weather_record_store::WeatherRecordStore;
