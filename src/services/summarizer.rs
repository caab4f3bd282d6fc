//! Natural-language weather summaries.
//!
//! `summarize` never fails. Any error along the way (network, provider
//! rejection, malformed response) is returned as the summary text itself,
//! so callers can always display the result as-is, even when it is an
//! error message.

use crate::models::CurrentConditions;
use crate::services::text_generation::{GenerationRequest, TextGenerator};
use crate::utils::units::kelvin_to_celsius;
use tracing::warn;

const SUMMARY_MAX_TOKENS: u32 = 60;
const SUMMARY_TEMPERATURE: f32 = 0.7;

/// Build the prompt for a current-conditions summary
pub fn summary_prompt(conditions: &CurrentConditions) -> String {
    format!(
        "The current weather is {} with a temperature of {:.1}°C. Generate a short, friendly weather summary.",
        conditions.description,
        kelvin_to_celsius(conditions.temperature)
    )
}

/// Summarizes current conditions through the text generator
#[derive(Clone)]
pub struct SummaryGenerator {
    generator: TextGenerator,
}

/// Summary text and whether it is an error message standing in for one
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    pub is_fallback: bool,
}

impl SummaryGenerator {
    pub fn new(generator: TextGenerator) -> Self {
        Self { generator }
    }

    /// Summarize conditions; on failure the error's text is returned instead,
    /// flagged with `is_fallback`
    pub async fn summarize(&self, conditions: &CurrentConditions) -> Summary {
        let request = GenerationRequest {
            prompt: summary_prompt(conditions),
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };

        match self.generator.generate(&request).await {
            Ok(text) => Summary {
                text,
                is_fallback: false,
            },
            Err(e) => {
                warn!(error = %e, "Summary generation failed, showing error text");
                Summary {
                    text: e.to_string(),
                    is_fallback: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TextGenerationConfig, TextProvider};
    use crate::models::Coordinate;
    use crate::services::resilient_client::{ResilientClient, ResilientClientConfig};

    fn conditions(kelvin: f64, description: &str) -> CurrentConditions {
        CurrentConditions {
            city_name: Some("Paris".to_string()),
            temperature: kelvin,
            humidity: 40,
            pressure: 1012,
            wind_speed: 3.6,
            description: description.to_string(),
            coordinate: Coordinate { lat: 48.85, lon: 2.35 },
            status_code: 200,
        }
    }

    fn summarizer(config: TextGenerationConfig) -> SummaryGenerator {
        let client = ResilientClient::new(ResilientClientConfig::default(), None).unwrap();
        SummaryGenerator::new(TextGenerator::new(config, client))
    }

    #[test]
    fn test_prompt_rounds_to_one_decimal() {
        assert_eq!(
            summary_prompt(&conditions(300.15, "clear sky")),
            "The current weather is clear sky with a temperature of 27.0°C. Generate a short, friendly weather summary."
        );
        assert!(summary_prompt(&conditions(273.2, "light snow")).contains("0.1°C"));
    }

    #[tokio::test]
    async fn test_failure_becomes_summary_text() {
        let summarizer = summarizer(TextGenerationConfig::for_provider(TextProvider::Cohere, None));
        let summary = summarizer.summarize(&conditions(280.0, "mist")).await;
        assert!(summary.is_fallback);
        assert_eq!(summary.text, "cohere API key not configured");
    }

    #[tokio::test]
    async fn test_mock_summary() {
        let summarizer = summarizer(TextGenerationConfig::default());
        let summary = summarizer.summarize(&conditions(300.15, "clear sky")).await;
        assert!(!summary.is_fallback);
        assert!(summary.text.starts_with("[mock completion] The current weather is clear sky"));
    }
}
