//! OpenAI-compatible chat-completions client.

use super::conversion::{self, RequestDefaults};
use super::dto::ChatResponse;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use storyloom_core::{GenerateRequest, GenerateResponse};
use storyloom_error::{ConfigError, ServiceError, ServiceErrorKind, StoryloomResult};
use storyloom_interface::StoryDriver;
use storyloom_rate_limit::{RateLimiter, StoryloomConfig};
use tracing::{debug, instrument, warn};

/// Client for any service speaking the chat-completions protocol.
///
/// One `generate` call is one HTTP request. Every request first waits on
/// the shared rate limiter.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    limiter: RateLimiter,
}

impl OpenAICompatibleClient {
    /// Creates a client with no rate limit and default sampling.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            provider: provider.into(),
            temperature: None,
            max_tokens: None,
            limiter: RateLimiter::unlimited(),
        }
    }

    /// Creates a client from the `[provider]` and `[rate_limit]` sections.
    ///
    /// Reads the API key from the environment variable named by
    /// `provider.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not set or the HTTP client cannot be
    /// initialized.
    #[instrument(skip_all, fields(provider = %config.provider.name, model = %config.provider.model))]
    pub fn from_config(config: &StoryloomConfig) -> StoryloomResult<Self> {
        let api_key = std::env::var(&config.provider.api_key_env).map_err(|_| {
            ServiceError::new(ServiceErrorKind::MissingCredential(
                config.provider.api_key_env.clone(),
            ))
        })?;
        Self::from_config_with_key(config, api_key)
    }

    /// Creates a client from configuration with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip_all, fields(provider = %config.provider.name, model = %config.provider.model))]
    pub fn from_config_with_key(
        config: &StoryloomConfig,
        api_key: impl Into<String>,
    ) -> StoryloomResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        debug!("Client configured");

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.provider.model.clone(),
            base_url: config.provider.base_url.clone(),
            provider: config.provider.name.clone(),
            temperature: config.provider.temperature,
            max_tokens: config.provider.max_tokens,
            limiter: RateLimiter::new(&config.rate_limit),
        })
    }

    /// Replace the rate limiter.
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Set the default sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, req: &GenerateRequest) -> Result<GenerateResponse, ServiceError> {
        let defaults = RequestDefaults {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let body = conversion::to_chat_request(req, &defaults)?;

        debug!(url = %self.base_url, messages = body.messages().len(), "Sending chat-completions request");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ServiceError::new(ServiceErrorKind::Transport(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ServiceError::new(ServiceErrorKind::Transport(format!(
                "Failed to read response body: {}",
                e
            )))
        })?;

        if !status.is_success() {
            let message = conversion::error_message(&text);
            warn!(status = status.as_u16(), %message, "Service returned an error status");
            return Err(ServiceError::new(ServiceErrorKind::Status {
                status: status.as_u16(),
                message,
            }));
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            ServiceError::new(ServiceErrorKind::Decode(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        conversion::from_chat_response(&parsed)
    }
}

#[async_trait]
impl StoryDriver for OpenAICompatibleClient {
    #[instrument(skip(self, req), fields(provider = %self.provider, model = %self.model))]
    async fn generate(&self, req: &GenerateRequest) -> StoryloomResult<GenerateResponse> {
        let _guard = self.limiter.acquire().await?;
        let response = self.post(req).await?;
        debug!(outputs = response.outputs.len(), "Response received");
        Ok(response)
    }

    fn provider_name(&self) -> &str {
        &self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
