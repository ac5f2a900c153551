//! Application services - Use case implementations

mod weather_collector;

pub use weather_collector::WeatherCollector;
