//! Daily forecast grid derived from the 3-hour forecast series.

use crate::models::{ForecastEntry, ForecastSeries};
use crate::utils::units::{capitalize, kelvin_to_celsius, weather_icon};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Maximum number of distinct days shown in the grid
pub const MAX_FORECAST_DAYS: usize = 7;

/// One row of the forecast grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DailySummary {
    /// Day label, e.g. "Monday, Jun 03"
    pub day: String,
    /// Epoch seconds of the entry representing this day
    pub timestamp: i64,
    pub icon: String,
    /// Provider description with the first letter capitalized
    pub description: String,
    /// Minimum temperature, e.g. "12.3°C"
    pub min_temp: String,
    /// Maximum temperature, e.g. "18.0°C"
    pub max_temp: String,
}

/// Convert an epoch timestamp into `tz`; `None` if out of chrono's range
pub fn localize<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(tz))
}

/// First entry of each distinct calendar day in `tz`, stopping after
/// [`MAX_FORECAST_DAYS`] days.
///
/// "First" means first in series order. Applying the projection to its own
/// output yields the same entries.
pub fn first_entry_per_day<'a, Tz: TimeZone>(
    series: &'a ForecastSeries,
    tz: &Tz,
) -> Vec<(NaiveDate, &'a ForecastEntry)> {
    let mut days: Vec<(NaiveDate, &ForecastEntry)> = Vec::with_capacity(MAX_FORECAST_DAYS);

    for entry in series.iter() {
        if days.len() == MAX_FORECAST_DAYS {
            break;
        }
        let Some(local) = localize(entry.timestamp, tz) else {
            continue;
        };
        let date = local.date_naive();
        if days.iter().all(|(seen, _)| *seen != date) {
            days.push((date, entry));
        }
    }

    days
}

/// Daily grid rows using `tz` for day boundaries
pub fn daily_summaries_in<Tz: TimeZone>(series: &ForecastSeries, tz: &Tz) -> Vec<DailySummary>
where
    Tz::Offset: std::fmt::Display,
{
    first_entry_per_day(series, tz)
        .into_iter()
        .filter_map(|(_, entry)| {
            let local = localize(entry.timestamp, tz)?;
            Some(DailySummary {
                day: local.format("%A, %b %d").to_string(),
                timestamp: entry.timestamp,
                icon: weather_icon(&entry.description).to_string(),
                description: capitalize(&entry.description),
                min_temp: format!("{:.1}°C", kelvin_to_celsius(entry.temperature_min)),
                max_temp: format!("{:.1}°C", kelvin_to_celsius(entry.temperature_max)),
            })
        })
        .collect()
}

/// Daily grid rows using the server's local time zone
pub fn daily_summaries(series: &ForecastSeries) -> Vec<DailySummary> {
    daily_summaries_in(series, &Local)
}
