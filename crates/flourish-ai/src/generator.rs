use std::time::Duration;

use async_trait::async_trait;
use flourish_config::AiConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::GeneratorError;
use crate::protocol::{GeminiRequest, GeminiResponse};

/// A text generation backend that answers with JSON text
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// Google Gemini `generateContent` client
pub struct GeminiGenerator {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiGenerator {
    pub fn new(
        base_url: Url,
        api_key: SecretString,
        model: String,
        temperature: f32,
        max_output_tokens: u32,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
            temperature,
            max_output_tokens,
        })
    }

    /// Build a generator when the config carries a usable key
    pub fn from_config(config: &AiConfig) -> anyhow::Result<Option<Self>> {
        let Some(api_key) = config.usable_api_key() else {
            return Ok(None);
        };

        Self::new(
            config.base_url.clone(),
            api_key.clone(),
            config.model.clone(),
            config.temperature,
            config.max_output_tokens,
            config.timeout(),
        )
        .map(Some)
    }

    /// Build the `generateContent` endpoint URL for the model
    fn generate_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/models/{}:generateContent", self.model)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let request = GeminiRequest::json_prompt(prompt, self.temperature, self.max_output_tokens);

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %self.model, error = %e, "gemini request failed");
                GeneratorError::Request(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.model, status = %status, "gemini returned error");
            return Err(GeneratorError::Upstream(format!("provider returned {status}: {body}")));
        }

        let wire: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Upstream(format!("failed to parse response: {e}")))?;

        wire.first_text().ok_or_else(|| GeneratorError::Empty(wire.empty_reason()))
    }
}
