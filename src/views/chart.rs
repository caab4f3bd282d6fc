//! Time-series chart data for the forecast.
//!
//! Only the data contract is produced here; drawing is left to Chart.js in
//! the browser.

use super::forecast::localize;
use crate::models::{ForecastEntry, ForecastSeries};
use crate::utils::units::kelvin_to_celsius;
use chrono::{Local, TimeZone};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// One plotted line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// A line chart sharing one timestamp axis across its series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct TimeSeriesChart {
    pub title: String,
    /// Ascending local timestamps, "%Y-%m-%d %H:%M"
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

/// Both forecast charts: temperatures together, humidity on its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ForecastCharts {
    pub temperature: TimeSeriesChart,
    pub humidity: TimeSeriesChart,
}

/// Build both charts over the full, ungrouped series
pub fn forecast_charts_in<Tz: TimeZone>(series: &ForecastSeries, tz: &Tz) -> ForecastCharts
where
    Tz::Offset: std::fmt::Display,
{
    let mut points: Vec<(String, &ForecastEntry)> = series
        .iter()
        .filter_map(|entry| {
            localize(entry.timestamp, tz)
                .map(|local| (local.format("%Y-%m-%d %H:%M").to_string(), entry))
        })
        .collect();
    points.sort_by_key(|(_, entry)| entry.timestamp);

    let labels: Vec<String> = points.iter().map(|(label, _)| label.clone()).collect();

    ForecastCharts {
        temperature: TimeSeriesChart {
            title: "Temperature (°C)".to_string(),
            labels: labels.clone(),
            series: vec![
                ChartSeries {
                    label: "Temperature (°C)".to_string(),
                    values: points.iter().map(|(_, e)| kelvin_to_celsius(e.temperature)).collect(),
                },
                ChartSeries {
                    label: "Feels Like (°C)".to_string(),
                    values: points.iter().map(|(_, e)| kelvin_to_celsius(e.feels_like)).collect(),
                },
            ],
        },
        humidity: TimeSeriesChart {
            title: "Humidity (%)".to_string(),
            labels,
            series: vec![ChartSeries {
                label: "Humidity (%)".to_string(),
                values: points.iter().map(|(_, e)| f64::from(e.humidity)).collect(),
            }],
        },
    }
}

/// Build both charts using the server's local time zone
pub fn forecast_charts(series: &ForecastSeries) -> ForecastCharts {
    forecast_charts_in(series, &Local)
}
