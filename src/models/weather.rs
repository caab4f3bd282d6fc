//! Weather domain models produced by the weather client.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Geographic coordinate of a resolved location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Instantaneous weather snapshot for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct CurrentConditions {
    /// Location name as resolved by the provider, when reported
    pub city_name: Option<String>,
    /// Temperature in Kelvin
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: u32,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Short free-text description (e.g., "clear sky")
    pub description: String,
    pub coordinate: Coordinate,
    /// Provider status code (`cod`), normalized to an integer
    pub status_code: i64,
}

/// One 3-hour step of the short-range forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ForecastEntry {
    /// Epoch seconds
    pub timestamp: i64,
    /// Kelvin
    pub temperature: f64,
    /// Kelvin
    pub temperature_min: f64,
    /// Kelvin
    pub temperature_max: f64,
    /// Kelvin
    pub feels_like: f64,
    pub humidity: u8,
    pub description: String,
}

/// Forecast entries in the order the provider delivered them
///
/// The provider delivers entries in non-decreasing timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ForecastSeries {
    pub entries: Vec<ForecastEntry>,
}

impl ForecastSeries {
    pub fn new(entries: Vec<ForecastEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastEntry> {
        self.entries.iter()
    }
}
