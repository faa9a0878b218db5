// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible chat completions API.
//!
//! A request is sent exactly once. Timeouts, transport failures, non-2xx
//! statuses, and unparseable bodies all surface as [`ParleyError::Provider`].

use std::time::Duration;

use parley_core::ParleyError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiClient {
    /// Builds a client that authenticates with `api_key` as a bearer token.
    ///
    /// `base_url` is the API root (for example `https://api.openai.com/v1`).
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, ParleyError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ParleyError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ParleyError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one completion request and returns the parsed response.
    pub async fn create_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ParleyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out: {e}")
                } else {
                    format!("HTTP request failed: {e}")
                };
                ParleyError::Provider {
                    message,
                    source: Some(Box::new(e)),
                }
            })?;

        let status = response.status();
        debug!(status = %status, "completion response received");

        let body = response.text().await.map_err(|e| ParleyError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "API error {status} ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            warn!(status = %status, "completion request rejected");
            return Err(ParleyError::Provider {
                message,
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| ParleyError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
