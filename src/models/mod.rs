//! Data models for weather and location state.
//!
//! - `Coordinate`, `LocationRecord`: validated geographic types
//! - `WeatherSnapshot`: verbatim provider payload plus cache provenance
//! - `ForecastResponse` and friends: typed views over the payload,
//!   including the daily aggregation used by the 5-day view

pub mod coordinate;
pub mod forecast;

pub use coordinate::{Coordinate, LocationRecord, LocationSource};
pub use forecast::{check_roundtrip, ForecastResponse, WeatherSnapshot};
