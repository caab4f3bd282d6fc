//! Unit conversion and description-driven icon/background lookups.
//!
//! All lookups are case-insensitive substring matches on the provider's
//! free-text description, evaluated in a fixed precedence order.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Offset between the Kelvin and Celsius scales
pub const KELVIN_OFFSET: f64 = 273.15;

/// Convert a Kelvin temperature to Celsius
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Icon shown next to a weather description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    Clear,
    Cloud,
    Rain,
    Snow,
    Storm,
    Fog,
    Default,
}

impl WeatherIcon {
    /// Resolve the icon for a description.
    ///
    /// Precedence: clear > cloud > rain > snow > storm/thunder > fog/mist > default.
    pub fn from_description(description: &str) -> Self {
        let desc = description.to_lowercase();
        if desc.contains("clear") {
            WeatherIcon::Clear
        } else if desc.contains("cloud") {
            WeatherIcon::Cloud
        } else if desc.contains("rain") {
            WeatherIcon::Rain
        } else if desc.contains("snow") {
            WeatherIcon::Snow
        } else if desc.contains("storm") || desc.contains("thunder") {
            WeatherIcon::Storm
        } else if desc.contains("fog") || desc.contains("mist") {
            WeatherIcon::Fog
        } else {
            WeatherIcon::Default
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WeatherIcon::Clear => "☀️",
            WeatherIcon::Cloud => "☁️",
            WeatherIcon::Rain => "🌧",
            WeatherIcon::Snow => "❄️",
            WeatherIcon::Storm => "⛈",
            WeatherIcon::Fog => "🌫",
            WeatherIcon::Default => "🌤",
        }
    }
}

/// Emoji icon for a weather description
pub fn weather_icon(description: &str) -> &'static str {
    WeatherIcon::from_description(description).emoji()
}

/// Background shown before any lookup and for unmatched descriptions
pub const DEFAULT_BACKGROUND: &str = "WeatherBackground1.jpg";

/// Background image file name for a weather description.
///
/// Note the precedence differs from [`WeatherIcon`]: storm/thunder is checked
/// before snow, and fog has no dedicated image.
pub fn background_image(description: &str) -> &'static str {
    let desc = description.to_lowercase();
    if desc.contains("clear") {
        "sunny.jpg"
    } else if desc.contains("cloud") {
        "cloudy.png"
    } else if desc.contains("rain") {
        "rainy.png"
    } else if desc.contains("storm") || desc.contains("thunder") {
        "stormy.jpg"
    } else if desc.contains("snow") {
        "snowy.png"
    } else {
        DEFAULT_BACKGROUND
    }
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}
