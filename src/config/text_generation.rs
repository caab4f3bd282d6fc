//! Text-generation provider configuration.

use std::env;
use tracing::warn;

/// Hosted completion API used for summaries and free-form chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextProvider {
    /// Cohere `generate` endpoint
    Cohere,
    /// OpenAI-compatible `chat/completions` endpoint
    OpenAi,
    /// Offline deterministic responses for development and tests
    Mock,
}

impl TextProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "cohere" => Some(TextProvider::Cohere),
            "openai" => Some(TextProvider::OpenAi),
            "mock" => Some(TextProvider::Mock),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextProvider::Cohere => "cohere",
            TextProvider::OpenAi => "openai",
            TextProvider::Mock => "mock",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            TextProvider::Cohere => "https://api.cohere.ai/v1",
            TextProvider::OpenAi => "https://api.openai.com/v1",
            TextProvider::Mock => "",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            TextProvider::Cohere => "command-r-plus",
            TextProvider::OpenAi => "gpt-3.5-turbo",
            TextProvider::Mock => "mock",
        }
    }
}

/// Configuration for the text generator
#[derive(Debug, Clone)]
pub struct TextGenerationConfig {
    pub provider: TextProvider,
    pub api_key: Option<String>,
    /// Overrides the provider's default base URL
    pub base_url: Option<String>,
    pub model: String,
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            provider: TextProvider::Mock,
            api_key: None,
            base_url: None,
            model: TextProvider::Mock.default_model().to_string(),
        }
    }
}

impl TextGenerationConfig {
    /// Config for a given provider with its default model
    pub fn for_provider(provider: TextProvider, api_key: Option<String>) -> Self {
        Self {
            provider,
            api_key,
            base_url: None,
            model: provider.default_model().to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Without an explicit `TEXT_GENERATION_PROVIDER`, Cohere is used when a
    /// key is present and the mock provider otherwise.
    pub fn from_env() -> Self {
        let api_key = env::var("TEXT_GENERATION_API_KEY")
            .or_else(|_| env::var("COHERE_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let provider = match env::var("TEXT_GENERATION_PROVIDER") {
            Ok(value) => TextProvider::parse(&value).unwrap_or_else(|| {
                warn!(provider = %value, "Unknown text generation provider, using mock");
                TextProvider::Mock
            }),
            Err(_) if api_key.is_some() => TextProvider::Cohere,
            Err(_) => TextProvider::Mock,
        };

        let model = env::var("TEXT_GENERATION_MODEL")
            .unwrap_or_else(|_| provider.default_model().to_string());

        Self {
            provider,
            api_key,
            base_url: env::var("TEXT_GENERATION_BASE_URL").ok(),
            model,
        }
    }

    /// Effective base URL without trailing slash
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    fn clear_env() {
        unsafe {
            env::remove_var("TEXT_GENERATION_PROVIDER");
            env::remove_var("TEXT_GENERATION_API_KEY");
            env::remove_var("COHERE_API_KEY");
            env::remove_var("TEXT_GENERATION_BASE_URL");
            env::remove_var("TEXT_GENERATION_MODEL");
        }
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!(TextProvider::parse("Cohere"), Some(TextProvider::Cohere));
        assert_eq!(TextProvider::parse(" openai "), Some(TextProvider::OpenAi));
        assert_eq!(TextProvider::parse("mock"), Some(TextProvider::Mock));
        assert_eq!(TextProvider::parse("palm"), None);
    }

    #[test]
    fn test_defaults_to_mock_without_key() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = TextGenerationConfig::from_env();
        assert_eq!(config.provider, TextProvider::Mock);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_cohere_key_selects_cohere() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        unsafe {
            env::set_var("COHERE_API_KEY", "co-key");
        }

        let config = TextGenerationConfig::from_env();
        assert_eq!(config.provider, TextProvider::Cohere);
        assert_eq!(config.model, "command-r-plus");
        assert_eq!(config.effective_base_url(), "https://api.cohere.ai/v1");

        clear_env();
    }

    #[test]
    fn test_explicit_overrides() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        unsafe {
            env::set_var("TEXT_GENERATION_PROVIDER", "openai");
            env::set_var("TEXT_GENERATION_API_KEY", "sk-test");
            env::set_var("TEXT_GENERATION_BASE_URL", "http://127.0.0.1:4000/v1/");
            env::set_var("TEXT_GENERATION_MODEL", "gpt-4o-mini");
        }

        let config = TextGenerationConfig::from_env();
        assert_eq!(config.provider, TextProvider::OpenAi);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.effective_base_url(), "http://127.0.0.1:4000/v1");

        clear_env();
    }
}
