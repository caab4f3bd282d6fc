//! Chat dispatcher: city lookup or free-form completion per message.

use crate::models::ChatRoute;
use crate::services::summarizer::SummaryGenerator;
use crate::services::text_generation::{GenerationRequest, TextGenerator};
use crate::services::weather::{WeatherClient, WeatherError};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Instruction prepended verbatim to free-form messages
pub const CHAT_INSTRUCTION_PREFIX: &str = "You are a weather chatbot. Answer weather-related queries helpfully, \
including forecast details when a city is named. If the query is not about the weather, reply exactly: \
Inquiry not understood. Please ask about the weather.\n\nUser: ";

const CHAT_MAX_TOKENS: u32 = 100;
const CHAT_TEMPERATURE: f32 = 0.7;

/// Runs of capitalized words: "New York", "Paris", "Tell"
static CAPITALIZED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").expect("valid city regex")
});

/// Guess a city name from free text: the last run of capitalized words.
///
/// This is a plain heuristic with known false positives. Sentence-initial
/// words count ("Tell me about Paris" has runs "Tell" and "Paris", so the
/// last one wins), and a message made only of capitalized words is taken
/// whole ("What Is The Weather"). Lowercase or all-caps city names are
/// never found.
pub fn extract_candidate_city(message: &str) -> Option<&str> {
    CAPITALIZED_RUN.find_iter(message).last().map(|m| m.as_str())
}

/// Reply text for a city the provider could not resolve
pub fn city_not_found_reply(candidate: &str) -> String {
    format!("Sorry, I could not find weather for {candidate}.")
}

/// Result of one dispatched chat turn
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub route: ChatRoute,
    pub candidate_city: Option<String>,
    pub reply: String,
    /// Why the city lookup failed; always `None` on the free-form route
    pub lookup_error: Option<WeatherError>,
    /// The reply is a summary failure's error text
    pub summary_is_fallback: bool,
}

/// Routes chat messages to the weather client or the text generator
#[derive(Clone)]
pub struct ChatDispatcher {
    weather: WeatherClient,
    summarizer: SummaryGenerator,
    generator: TextGenerator,
}

impl ChatDispatcher {
    pub fn new(weather: WeatherClient, summarizer: SummaryGenerator, generator: TextGenerator) -> Self {
        Self {
            weather,
            summarizer,
            generator,
        }
    }

    /// Produce the reply for a message
    ///
    /// No conversation is touched here, so callers can hold the session lock
    /// only while appending the finished exchange.
    pub async fn reply(&self, message: &str) -> ChatReply {
        match extract_candidate_city(message) {
            Some(candidate) => self.city_lookup(candidate).await,
            None => self.free_form(message).await,
        }
    }

    async fn city_lookup(&self, candidate: &str) -> ChatReply {
        debug!(candidate, "Chat message routed to city lookup");

        match self.weather.fetch_current(candidate).await {
            Ok(conditions) => {
                let summary = self.summarizer.summarize(&conditions).await;
                ChatReply {
                    route: ChatRoute::CityLookup,
                    candidate_city: Some(candidate.to_string()),
                    reply: summary.text,
                    lookup_error: None,
                    summary_is_fallback: summary.is_fallback,
                }
            }
            Err(e) => {
                // A wrong guess is not retried as free-form text
                info!(candidate, outcome = e.outcome(), "Chat city lookup failed");
                ChatReply {
                    route: ChatRoute::CityLookup,
                    candidate_city: Some(candidate.to_string()),
                    reply: city_not_found_reply(candidate),
                    lookup_error: Some(e),
                    summary_is_fallback: false,
                }
            }
        }
    }

    async fn free_form(&self, message: &str) -> ChatReply {
        debug!("Chat message routed to free-form completion");

        let request = GenerationRequest {
            prompt: format!("{CHAT_INSTRUCTION_PREFIX}{message}"),
            max_tokens: CHAT_MAX_TOKENS,
            temperature: CHAT_TEMPERATURE,
        };

        let reply = self
            .generator
            .generate(&request)
            .await
            .unwrap_or_else(|e| e.to_string());

        ChatReply {
            route: ChatRoute::FreeForm,
            candidate_city: None,
            reply,
            lookup_error: None,
            summary_is_fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TextGenerationConfig, TextProvider, WeatherProviderConfig};
    use crate::services::resilient_client::ResilientClient;
    use serde_json::json;
    use wiremock::matchers::{path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dispatcher(weather_uri: &str, text: TextGenerationConfig) -> ChatDispatcher {
        let client = ResilientClient::new(Default::default(), None).unwrap();
        let generator = TextGenerator::new(text, client.clone());
        ChatDispatcher::new(
            WeatherClient::new(
                WeatherProviderConfig {
                    api_key: "k".to_string(),
                    base_url: weather_uri.to_string(),
                },
                client,
            ),
            SummaryGenerator::new(generator.clone()),
            generator,
        )
    }

    #[test]
    fn test_last_capitalized_run_wins() {
        assert_eq!(extract_candidate_city("How is the weather in New York"), Some("New York"));
        assert_eq!(extract_candidate_city("Tell me about Paris"), Some("Paris"));
        assert_eq!(extract_candidate_city("Is Paris hot?"), Some("Is Paris"));
        assert_eq!(extract_candidate_city("London or Rome, please"), Some("Rome"));
    }

    #[test]
    fn test_no_candidate() {
        assert_eq!(extract_candidate_city("hello there"), None);
        assert_eq!(extract_candidate_city("hi"), None);
        assert_eq!(extract_candidate_city("what about NYC"), None);
        assert_eq!(extract_candidate_city(""), None);
    }

    #[test]
    fn test_documented_false_positive() {
        assert_eq!(extract_candidate_city("What Is The Weather"), Some("What Is The Weather"));
        assert_eq!(extract_candidate_city("Hello"), Some("Hello"));
    }

    #[test]
    fn test_instruction_prefix_mentions_fallback_reply() {
        assert!(CHAT_INSTRUCTION_PREFIX.contains("Inquiry not understood. Please ask about the weather."));
        assert!(CHAT_INSTRUCTION_PREFIX.ends_with("User: "));
    }

    #[tokio::test]
    async fn test_city_lookup_reports_lookup_error() {
        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .and(query_param("q", "Atlantis"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"cod": "404"})))
            .expect(1)
            .mount(&server)
            .await;

        let reply = dispatcher(&server.uri(), TextGenerationConfig::default())
            .reply("Weather in Atlantis")
            .await;

        assert_eq!(reply.route, ChatRoute::CityLookup);
        assert_eq!(reply.reply, city_not_found_reply("Atlantis"));
        assert_eq!(reply.lookup_error, Some(WeatherError::NotFound("Atlantis".to_string())));
        assert!(!reply.summary_is_fallback);
    }

    #[tokio::test]
    async fn test_city_lookup_flags_summary_fallback() {
        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": 200,
                "name": "Paris",
                "coord": {"lat": 48.85, "lon": 2.35},
                "main": {"temp": 290.0, "humidity": 50, "pressure": 1010},
                "wind": {"speed": 2.0},
                "weather": [{"description": "few clouds"}]
            })))
            .mount(&server)
            .await;

        let text = TextGenerationConfig::for_provider(TextProvider::Cohere, None);
        let reply = dispatcher(&server.uri(), text).reply("Tell me about Paris").await;

        assert_eq!(reply.candidate_city.as_deref(), Some("Paris"));
        assert_eq!(reply.lookup_error, None);
        assert!(reply.summary_is_fallback);
        assert_eq!(reply.reply, "cohere API key not configured");
    }

    #[tokio::test]
    async fn test_free_form_never_calls_weather() {
        let server = MockServer::start().await;
        Mock::given(path("/weather"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let reply = dispatcher(&server.uri(), TextGenerationConfig::default()).reply("hi").await;

        assert_eq!(reply.route, ChatRoute::FreeForm);
        assert_eq!(reply.candidate_city, None);
        assert!(reply.reply.starts_with("[mock completion]"));
    }
}
