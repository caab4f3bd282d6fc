//! Shared setup for the integration tests: providers are wiremock servers.

#![allow(dead_code)]

use serde_json::{Value, json};
use weather_chat_dashboard::{AppConfig, AppServices, RateLimitConfig, TextGenerationConfig, TextProvider};

/// App configuration pointing both providers at `weather_uri` / `text_uri`
pub fn config(weather_uri: &str, text: TextGenerationConfig) -> AppConfig {
    let mut config = AppConfig::default();
    config.weather.api_key = "test-key".to_string();
    config.weather.base_url = weather_uri.to_string();
    config.text_generation = text;
    config.rate_limit = RateLimitConfig {
        requests_per_minute: 1000,
        period_seconds: 60,
    };
    config
}

pub fn cohere(text_uri: &str) -> TextGenerationConfig {
    let mut text = TextGenerationConfig::for_provider(TextProvider::Cohere, Some("cohere-key".to_string()));
    text.base_url = Some(text_uri.to_string());
    text
}

pub fn services(config: &AppConfig) -> AppServices {
    AppServices::from_config(config).expect("services")
}

pub fn current_body(temp: f64, humidity: u8, description: &str) -> Value {
    json!({
        "cod": 200,
        "name": "Paris",
        "coord": {"lat": 48.85, "lon": 2.35},
        "main": {"temp": temp, "humidity": humidity, "pressure": 1013},
        "wind": {"speed": 3.6},
        "weather": [{"description": description}]
    })
}

/// Two days of 3-hourly entries starting 2024-06-03T00:00:00Z
pub fn forecast_body() -> Value {
    let list: Vec<Value> = (0..16)
        .map(|i| {
            json!({
                "dt": 1_717_372_800 + i * 3 * 3600,
                "main": {
                    "temp": 290.15,
                    "temp_min": 288.15,
                    "temp_max": 293.15,
                    "feels_like": 289.15,
                    "humidity": 60
                },
                "weather": [{"description": "few clouds"}]
            })
        })
        .collect();
    json!({"cod": "200", "list": list})
}

pub fn cohere_reply(text: &str) -> Value {
    json!({"generations": [{"text": text}]})
}
