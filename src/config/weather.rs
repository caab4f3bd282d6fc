//! Weather provider configuration.

use std::env;

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Connection settings for the OpenWeatherMap-compatible provider
#[derive(Debug, Clone)]
pub struct WeatherProviderConfig {
    /// `appid` credential; an empty key is passed through and rejected by the provider
    pub api_key: String,
    /// Base URL without trailing slash; `/weather` and `/forecast` are appended
    pub base_url: String,
}

impl Default for WeatherProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
        }
    }
}

impl WeatherProviderConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let api_key = env::var("OPENWEATHER_API_KEY")
            .or_else(|_| env::var("WEATHER_API_KEY"))
            .unwrap_or_default();

        let base_url = env::var("OPENWEATHER_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_OPENWEATHER_BASE_URL.to_string());

        Self { api_key, base_url }
    }

    /// Whether a credential was supplied at all
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    #[test]
    fn test_weather_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        unsafe {
            env::remove_var("OPENWEATHER_API_KEY");
            env::set_var("WEATHER_API_KEY", "legacy-key");
            env::set_var("OPENWEATHER_BASE_URL", "http://localhost:9000/data/2.5/");
        }
        let config = WeatherProviderConfig::from_env();
        assert_eq!(config.api_key, "legacy-key");
        assert_eq!(config.base_url, "http://localhost:9000/data/2.5");
        assert!(config.has_credentials());

        unsafe {
            env::remove_var("WEATHER_API_KEY");
            env::remove_var("OPENWEATHER_BASE_URL");
        }
        let config = WeatherProviderConfig::from_env();
        assert!(!config.has_credentials());
        assert_eq!(config.base_url, DEFAULT_OPENWEATHER_BASE_URL);
    }
}
