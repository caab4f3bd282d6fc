//! Weather client for current conditions and the 5-day/3-hour forecast.
//!
//! The provider reports its own status in the `cod` body field, as an
//! integer for current conditions and as a string for forecasts, and sends
//! a JSON body even on 404. Bodies are therefore parsed regardless of the
//! HTTP status and classified by `cod`.

use crate::config::WeatherProviderConfig;
use crate::models::{Coordinate, CurrentConditions, ForecastEntry, ForecastSeries};
use crate::services::resilient_client::{ResilientClient, ResilientClientError};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Errors surfaced by the weather client
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeatherError {
    /// The provider could not resolve the city or coordinate
    #[error("City not found: {0}")]
    NotFound(String),

    /// Non-success status, malformed body, or transport failure
    #[error("Weather provider error: {0}")]
    Provider(String),
}

impl WeatherError {
    /// Label used for metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            WeatherError::NotFound(_) => "not_found",
            WeatherError::Provider(_) => "provider_error",
        }
    }
}

impl From<ResilientClientError> for WeatherError {
    fn from(e: ResilientClientError) -> Self {
        WeatherError::Provider(e.user_message())
    }
}

/// `cod` arrives as `200` for current conditions and `"200"` for forecasts
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ProviderStatus {
    Code(i64),
    Text(String),
}

impl ProviderStatus {
    fn code(&self) -> Option<i64> {
        match self {
            ProviderStatus::Code(code) => Some(*code),
            ProviderStatus::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentBody {
    cod: Option<ProviderStatus>,
    message: Option<Value>,
    name: Option<String>,
    main: Option<CurrentMain>,
    #[serde(default)]
    weather: Vec<ConditionBody>,
    wind: Option<WindBody>,
    coord: Option<Coordinate>,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct ConditionBody {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindBody {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastBody {
    cod: Option<ProviderStatus>,
    message: Option<Value>,
    list: Option<Vec<ForecastItem>>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: ForecastMain,
    #[serde(default)]
    weather: Vec<ConditionBody>,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    feels_like: f64,
    humidity: u8,
}

/// Classification of a provider `cod`
enum StatusClass {
    Ok(i64),
    NotFound,
    Other(String),
}

fn classify(status: Option<&ProviderStatus>, message: Option<&Value>) -> StatusClass {
    let message = message
        .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
        .unwrap_or_default();

    match status.and_then(ProviderStatus::code) {
        Some(200) => StatusClass::Ok(200),
        Some(404) => StatusClass::NotFound,
        Some(code) if message.is_empty() => StatusClass::Other(format!("status {code}")),
        Some(code) => StatusClass::Other(format!("status {code}: {message}")),
        None => StatusClass::Other("response is missing a status code".to_string()),
    }
}

fn first_description(conditions: &[ConditionBody]) -> String {
    conditions
        .first()
        .map(|c| c.description.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Weather client for external API integration
///
/// Each call makes exactly one outbound request. Nothing is cached: asking
/// twice for the same city fetches twice.
#[derive(Clone)]
pub struct WeatherClient {
    client: ResilientClient,
    config: WeatherProviderConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherProviderConfig, client: ResilientClient) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<String, WeatherError> {
        let base = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let url = url::Url::parse_with_params(&base, params)
            .map_err(|e| WeatherError::Provider(format!("Invalid weather provider URL: {e}")))?;
        Ok(url.into())
    }

    async fn fetch_body<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        let response = self.client.get(url).await?;
        let http_status = response.status();

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Provider(format!("Failed to read weather response: {e}")))?;

        serde_json::from_str(&body).map_err(|e| {
            warn!(http_status = http_status.as_u16(), error = %e, "Malformed weather provider body");
            WeatherError::Provider(format!("Failed to parse weather data: {e}"))
        })
    }

    /// Fetch current conditions by city name
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let url = self.endpoint(
            "weather",
            &[("q", city.to_string()), ("appid", self.config.api_key.clone())],
        )?;
        let body: CurrentBody = self.fetch_body(&url).await?;

        let status_code = match classify(body.cod.as_ref(), body.message.as_ref()) {
            StatusClass::Ok(code) => code,
            StatusClass::NotFound => return Err(WeatherError::NotFound(city.to_string())),
            StatusClass::Other(reason) => return Err(WeatherError::Provider(reason)),
        };

        // A success status without the measurement blocks is still unusable
        let (Some(main), Some(coordinate)) = (body.main, body.coord) else {
            return Err(WeatherError::Provider(
                "Current conditions response is missing measurements".to_string(),
            ));
        };

        let conditions = CurrentConditions {
            city_name: body.name,
            temperature: main.temp,
            humidity: main.humidity,
            pressure: main.pressure,
            wind_speed: body.wind.map(|w| w.speed).unwrap_or_default(),
            description: first_description(&body.weather),
            coordinate,
            status_code,
        };

        debug!(city = %city, description = %conditions.description, "Fetched current conditions");
        Ok(conditions)
    }

    /// Fetch the 5-day/3-hour forecast by coordinate
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastSeries, WeatherError> {
        let url = self.endpoint(
            "forecast",
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.config.api_key.clone()),
            ],
        )?;
        let body: ForecastBody = self.fetch_body(&url).await?;

        match classify(body.cod.as_ref(), body.message.as_ref()) {
            StatusClass::Ok(_) => {}
            StatusClass::NotFound => {
                return Err(WeatherError::NotFound(format!("({lat}, {lon})")));
            }
            StatusClass::Other(reason) => return Err(WeatherError::Provider(reason)),
        }

        let items = body.list.ok_or_else(|| {
            WeatherError::Provider("Forecast response is missing the entry list".to_string())
        })?;

        let entries = items
            .into_iter()
            .map(|item| ForecastEntry {
                timestamp: item.dt,
                temperature: item.main.temp,
                temperature_min: item.main.temp_min,
                temperature_max: item.main.temp_max,
                feels_like: item.main.feels_like,
                humidity: item.main.humidity,
                description: first_description(&item.weather),
            })
            .collect::<Vec<_>>();

        debug!(lat, lon, entries = entries.len(), "Fetched forecast");
        Ok(ForecastSeries::new(entries))
    }
}
