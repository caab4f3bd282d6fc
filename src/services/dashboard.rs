//! The "Get Weather" pipeline: current conditions, summary, forecast.

use crate::models::{CurrentConditions, ForecastSeries};
use crate::services::summarizer::{Summary, SummaryGenerator};
use crate::services::weather::{WeatherClient, WeatherError};
use tracing::{info, warn};

/// Everything fetched for one city lookup
#[derive(Debug, Clone, PartialEq)]
pub struct CityReport {
    /// The city as the user typed it
    pub city: String,
    pub current: CurrentConditions,
    pub summary: Summary,
    /// A failed forecast does not void the current conditions
    pub forecast: Result<ForecastSeries, WeatherError>,
}

#[derive(Clone)]
pub struct WeatherDashboard {
    weather: WeatherClient,
    summarizer: SummaryGenerator,
}

impl WeatherDashboard {
    pub fn new(weather: WeatherClient, summarizer: SummaryGenerator) -> Self {
        Self {
            weather,
            summarizer,
        }
    }

    /// Run the lookup sequence for `city`.
    ///
    /// Current conditions come first. If they fail, nothing else is
    /// requested and the error is returned. Otherwise the summary is
    /// generated and the forecast is fetched for the returned coordinate.
    pub async fn lookup(&self, city: &str) -> Result<CityReport, WeatherError> {
        let current = self.weather.fetch_current(city).await.inspect_err(|e| {
            info!(city, outcome = e.outcome(), "Current conditions lookup failed");
        })?;

        let summary = self.summarizer.summarize(&current).await;

        let forecast = self
            .weather
            .fetch_forecast(current.coordinate.lat, current.coordinate.lon)
            .await;
        if let Err(e) = &forecast {
            warn!(city, error = %e, "Forecast lookup failed");
        }

        Ok(CityReport {
            city: city.to_string(),
            current,
            summary,
            forecast,
        })
    }
}
