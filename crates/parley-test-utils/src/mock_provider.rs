// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies and
//! records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use parley_core::ParleyError;
use parley_core::traits::adapter::PluginAdapter;
use parley_core::traits::provider::ProviderAdapter;
use parley_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};

/// Reply text used when the script is exhausted.
pub const DEFAULT_REPLY: &str = "mock response";

enum Scripted {
    Reply(String),
    Failure(String),
}

/// A mock provider that pops scripted outcomes from a FIFO queue.
///
/// When the queue is empty, [`DEFAULT_REPLY`] is returned, unless the
/// provider was put into failing mode.
#[derive(Clone, Default)]
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    always_fail: Arc<AtomicBool>,
}

impl MockProvider {
    /// Create a new mock provider with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            script: Arc::new(Mutex::new(
                responses.into_iter().map(Scripted::Reply).collect(),
            )),
            ..Self::default()
        }
    }

    /// Create a mock provider that fails every request.
    pub fn failing() -> Self {
        let provider = Self::new();
        provider.always_fail.store(true, Ordering::SeqCst);
        provider
    }

    /// Queue a successful reply.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.script.lock().await.push_back(Scripted::Reply(text.into()));
    }

    /// Queue a single failure.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Failure(message.into()));
    }

    /// Toggle failing mode.
    pub fn set_failing(&self, failing: bool) {
        self.always_fail.store(failing, Ordering::SeqCst);
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ParleyError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        let next = if self.always_fail.load(Ordering::SeqCst) {
            Scripted::Failure("mock provider failure".to_string())
        } else {
            self.script
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Scripted::Reply(DEFAULT_REPLY.to_string()))
        };

        match next {
            Scripted::Reply(content) => Ok(ProviderResponse {
                id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
                content,
                model,
                finish_reason: Some("stop".to_string()),
                usage: Some(TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 20,
                }),
            }),
            Scripted::Failure(message) => Err(ParleyError::Provider {
                message,
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::types::ProviderMessage;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "mock-model".into(),
            messages: vec![ProviderMessage::system("sys")],
            max_tokens: 10,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn replies_in_order_then_default() {
        let provider = MockProvider::with_responses(vec!["one".into(), "two".into()]);
        assert_eq!(provider.complete(request()).await.unwrap().content, "one");
        assert_eq!(provider.complete(request()).await.unwrap().content, "two");
        assert_eq!(
            provider.complete(request()).await.unwrap().content,
            DEFAULT_REPLY
        );
        assert_eq!(provider.call_count().await, 3);
    }

    #[tokio::test]
    async fn scripted_failure_is_consumed_once() {
        let provider = MockProvider::new();
        provider.add_failure("boom").await;
        assert!(provider.complete(request()).await.is_err());
        assert!(provider.complete(request()).await.is_ok());
    }

    #[tokio::test]
    async fn failing_mode_rejects_everything_and_records_requests() {
        let provider = MockProvider::failing();
        assert!(provider.complete(request()).await.is_err());
        provider.set_failing(false);
        assert!(provider.complete(request()).await.is_ok());

        let seen = provider.requests().await;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].model, "mock-model");
    }
}
