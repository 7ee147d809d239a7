use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::base::{Provider, ProviderError, ProviderResponse};
use super::configs::gemini::GeminiProviderConfig;
use super::types::{
    message::Message,
    tool::{GenerationConfig, ToolDeclaration},
};
use super::utils::{build_payload, check_gemini_error, gemini_response_to_message};

pub struct GeminiProvider {
    client: Client,
    config: GeminiProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiProviderConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(anyhow!("Gemini API key must not be empty"));
        }
        HeaderValue::from_str(&config.api_key)
            .map_err(|_| anyhow!("Gemini API key contains invalid characters"))?;
        if config.model.trim().is_empty() {
            return Err(anyhow!("Gemini model must not be empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    async fn post(&self, payload: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.host.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => {
                let body = response.json::<Value>().await.unwrap_or(Value::Null);
                let err = check_gemini_error(status, &body);
                warn!(%status, error = %err, "Gemini request rejected");
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolDeclaration],
        config: &GenerationConfig,
    ) -> Result<ProviderResponse, ProviderError> {
        let payload = build_payload(system, messages, tools, config);
        let response = self.post(payload).await?;
        let parsed = gemini_response_to_message(&response)?;

        debug!(
            model = %self.config.model,
            finish_reason = ?parsed.finish_reason,
            input_tokens = ?parsed.usage.input_tokens,
            output_tokens = ?parsed.usage.output_tokens,
            total_tokens = ?parsed.usage.total_tokens,
            "Gemini reply received"
        );

        Ok(parsed)
    }
}
