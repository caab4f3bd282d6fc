//! Provider-neutral text completion client.

use crate::config::{TextGenerationConfig, TextProvider};
use crate::services::resilient_client::{ResilientClient, ResilientClientError};
use serde_json::{Value, json};
use tracing::{debug, info};

/// A single completion request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// Errors returned by the text generator
#[derive(Debug, thiserror::Error)]
pub enum TextGenerationError {
    #[error("{provider} API key not configured")]
    MissingApiKey { provider: &'static str },

    #[error("{0}")]
    Transport(#[from] ResilientClientError),

    #[error("{provider} API error {status}: {body}")]
    Provider {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid {provider} response format")]
    InvalidResponse { provider: &'static str },
}

/// Client for the configured completion provider
#[derive(Clone)]
pub struct TextGenerator {
    config: TextGenerationConfig,
    client: ResilientClient,
}

impl TextGenerator {
    pub fn new(config: TextGenerationConfig, client: ResilientClient) -> Self {
        Self { config, client }
    }

    /// Generate a completion and return the first candidate, trimmed
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, TextGenerationError> {
        debug!(
            provider = self.config.provider.as_str(),
            model = %self.config.model,
            max_tokens = request.max_tokens,
            "Requesting completion"
        );

        let text = match self.config.provider {
            TextProvider::Cohere => self.generate_cohere(request).await?,
            TextProvider::OpenAi => self.generate_openai(request).await?,
            TextProvider::Mock => mock_completion(&request.prompt),
        };

        Ok(text.trim().to_string())
    }

    fn api_key(&self) -> Result<&str, TextGenerationError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(TextGenerationError::MissingApiKey {
                provider: self.config.provider.as_str(),
            })
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TextGenerationError> {
        let provider = self.config.provider.as_str();
        let api_key = self.api_key()?;
        let url = format!("{}/{path}", self.config.effective_base_url());

        let response = self.client.post_json(&url, body, Some(api_key)).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            info!(provider, status, "Completion provider rejected request");
            return Err(TextGenerationError::Provider {
                provider,
                status,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|_| TextGenerationError::InvalidResponse { provider })
    }

    /// Cohere `generate`: `{generations: [{text}]}`
    async fn generate_cohere(&self, request: &GenerationRequest) -> Result<String, TextGenerationError> {
        let body = json!({
            "model": self.config.model,
            "prompt": request.prompt,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        let response = self.post("generate", &body).await?;

        response
            .get("generations")
            .and_then(|g| g.get(0))
            .and_then(|g| g.get("text"))
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or(TextGenerationError::InvalidResponse { provider: "cohere" })
    }

    /// OpenAI-compatible `chat/completions`: `{choices: [{message: {content}}]}`
    async fn generate_openai(&self, request: &GenerationRequest) -> Result<String, TextGenerationError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        let response = self.post("chat/completions", &body).await?;

        response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or(TextGenerationError::InvalidResponse { provider: "openai" })
    }
}

/// Offline completion: echoes the last line of the prompt
fn mock_completion(prompt: &str) -> String {
    let last_line = prompt.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
    format!("[mock completion] {}", last_line.trim())
}
