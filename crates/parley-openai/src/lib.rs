// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible completion provider for Parley.
//!
//! Implements [`ProviderAdapter`] on top of the `/chat/completions` endpoint.
//! Any server speaking that protocol can be targeted through `openai.base_url`.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use parley_config::model::OpenAiConfig;
use parley_core::error::ParleyError;
use parley_core::traits::{PluginAdapter, ProviderAdapter};
use parley_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Environment variable consulted when `openai.api_key` is not configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat completion provider implementing [`ProviderAdapter`].
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from configuration.
    ///
    /// The API key comes from `openai.api_key`, then `OPENAI_API_KEY`.
    pub fn new(config: &OpenAiConfig) -> Result<Self, ParleyError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(model = %config.model, endpoint = client.endpoint(), "OpenAI provider initialized");
        Ok(Self { client })
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        // No network probe: a health check should not spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ParleyError> {
        let api_request = to_api_request(request);
        let response = self.client.create_completion(&api_request).await?;
        from_api_response(response)
    }
}

fn to_api_request(request: ProviderRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: request.model,
        messages: request
            .messages
            .into_iter()
            .map(|m| ChatMessage {
                role: m.role,
                content: Some(m.content),
            })
            .collect(),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

/// Takes the first choice's text. A response without one is an error.
fn from_api_response(response: ChatCompletionResponse) -> Result<ProviderResponse, ParleyError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ParleyError::Provider {
            message: "API response contained no choices".into(),
            source: None,
        })?;
    let content = choice.message.content.ok_or_else(|| ParleyError::Provider {
        message: "API response choice had no text content".into(),
        source: None,
    })?;

    Ok(ProviderResponse {
        id: response.id,
        content,
        model: response.model,
        finish_reason: choice.finish_reason,
        usage: response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        }),
    })
}

/// Resolves the API key: non-empty config value, then [`API_KEY_ENV`].
fn resolve_api_key(config_key: &Option<String>) -> Result<String, ParleyError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(ParleyError::Config(format!(
            "OpenAI API key not found. Set openai.api_key in config or the {API_KEY_ENV} environment variable."
        ))),
    }
}
