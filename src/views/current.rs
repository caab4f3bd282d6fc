//! Current-conditions metrics.

use crate::models::CurrentConditions;
use crate::utils::units::{capitalize, kelvin_to_celsius, weather_icon};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// The four metric tiles plus the headline description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct CurrentMetrics {
    /// e.g. "27.00 °C"
    pub temperature: String,
    /// e.g. "40%"
    pub humidity: String,
    /// e.g. "1013 hPa"
    pub pressure: String,
    /// e.g. "3.6 m/s"
    pub wind_speed: String,
    pub description: String,
    pub icon: String,
}

pub fn current_metrics(conditions: &CurrentConditions) -> CurrentMetrics {
    CurrentMetrics {
        temperature: format!("{:.2} °C", kelvin_to_celsius(conditions.temperature)),
        humidity: format!("{}%", conditions.humidity),
        pressure: format!("{} hPa", conditions.pressure),
        wind_speed: format!("{} m/s", conditions.wind_speed),
        description: capitalize(&conditions.description),
        icon: weather_icon(&conditions.description).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    #[test]
    fn test_metric_formatting() {
        let conditions = CurrentConditions {
            city_name: None,
            temperature: 300.15,
            humidity: 40,
            pressure: 1013,
            wind_speed: 3.6,
            description: "clear sky".to_string(),
            coordinate: Coordinate { lat: 0.0, lon: 0.0 },
            status_code: 200,
        };

        let metrics = current_metrics(&conditions);
        assert_eq!(metrics.temperature, "27.00 °C");
        assert_eq!(metrics.humidity, "40%");
        assert_eq!(metrics.pressure, "1013 hPa");
        assert_eq!(metrics.wind_speed, "3.6 m/s");
        assert_eq!(metrics.icon, "☀️");
        assert_eq!(metrics.description, "Clear sky");
    }
}
