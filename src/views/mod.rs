//! Presentation layer: turns fetched weather into display-ready data.
//!
//! Every view here is a pure function of its input. The HTML page and the
//! JSON API share [`DashboardView`], so both surfaces show the same numbers.

pub mod chart;
pub mod current;
pub mod forecast;
pub mod map;
pub mod page;

pub use chart::*;
pub use current::*;
pub use forecast::*;
pub use map::*;
pub use page::*;

use crate::services::dashboard::CityReport;
use crate::utils::units::background_image;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Failures confined to a single view
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Failed to serialize view data: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::Serialization(e.to_string())
    }
}

/// Display-ready data for one city lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DashboardView {
    /// The city as requested
    pub city: String,
    pub current: CurrentMetrics,
    pub summary: String,
    /// True when `summary` is an error message rather than generated text
    pub summary_is_fallback: bool,
    /// Background image file name under `/assets/`
    pub background: String,
    pub daily: Vec<DailySummary>,
    /// Absent when the forecast could not be fetched
    pub charts: Option<ForecastCharts>,
    pub forecast_error: Option<String>,
    pub map: MapPanel,
}

impl DashboardView {
    pub fn from_report(report: &CityReport) -> Self {
        let (daily, charts, forecast_error) = match &report.forecast {
            Ok(series) => (daily_summaries(series), Some(forecast_charts(series)), None),
            Err(e) => (Vec::new(), None, Some(e.to_string())),
        };

        Self {
            city: report.city.clone(),
            current: current_metrics(&report.current),
            summary: report.summary.text.clone(),
            summary_is_fallback: report.summary.is_fallback,
            background: background_image(&report.current.description).to_string(),
            daily,
            charts,
            forecast_error,
            map: MapPanel::from(build_map(&report.current)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, CurrentConditions, ForecastSeries};
    use crate::services::summarizer::Summary;
    use crate::services::weather::WeatherError;

    fn report(lat: f64, forecast: Result<ForecastSeries, WeatherError>) -> CityReport {
        CityReport {
            city: "Lima".to_string(),
            current: CurrentConditions {
                city_name: Some("Lima".to_string()),
                temperature: 300.15,
                humidity: 70,
                pressure: 1011,
                wind_speed: 5.0,
                description: "broken clouds".to_string(),
                coordinate: Coordinate { lat, lon: -77.03 },
                status_code: 200,
            },
            summary: Summary {
                text: "Mild and grey.".to_string(),
                is_fallback: false,
            },
            forecast,
        }
    }

    #[test]
    fn test_view_from_complete_report() {
        let view = DashboardView::from_report(&report(-12.05, Ok(ForecastSeries::default())));
        assert_eq!(view.current.temperature, "27.00 °C");
        assert_eq!(view.background, "cloudy.png");
        assert_eq!(view.summary, "Mild and grey.");
        assert!(view.charts.is_some());
        assert!(view.forecast_error.is_none());
        assert!(view.map.map.is_some());
    }

    #[test]
    fn test_forecast_and_map_failures_stay_local() {
        let view = DashboardView::from_report(&report(
            123.0,
            Err(WeatherError::Provider("status 500".to_string())),
        ));
        assert_eq!(view.current.humidity, "70%");
        assert!(view.daily.is_empty());
        assert!(view.charts.is_none());
        assert_eq!(view.forecast_error.as_deref(), Some("Weather provider error: status 500"));
        assert!(view.map.map.is_none());
        assert!(view.map.error.is_some());
    }
}
