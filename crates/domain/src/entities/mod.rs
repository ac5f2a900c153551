//! Domain entities - Objects with identity and lifecycle

mod city;
mod weather_record;

pub use city::{City, CityTable};
pub use weather_record::WeatherRecord;
