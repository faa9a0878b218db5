// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One chat turn: persist the user message, ask the provider, persist the reply.

use std::sync::Arc;

use parley_config::model::OpenAiConfig;
use parley_core::types::{ProviderMessage, ProviderRequest, Role};
use parley_core::{ParleyError, ProviderAdapter, StorageAdapter};
use tracing::{debug, info, warn};

/// Generation parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&OpenAiConfig> for CompletionSettings {
    fn from(config: &OpenAiConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Result of a turn whose user message was accepted and stored.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The provider answered and the reply was stored.
    Replied { reply: String, conversation_id: i64 },
    /// The provider failed; no assistant message was stored.
    ProviderFailed {
        conversation_id: i64,
        error: ParleyError,
    },
}

impl TurnOutcome {
    /// Conversation the turn was recorded in.
    pub fn conversation_id(&self) -> i64 {
        match self {
            TurnOutcome::Replied {
                conversation_id, ..
            }
            | TurnOutcome::ProviderFailed {
                conversation_id, ..
            } => *conversation_id,
        }
    }

    /// The reply text, or `fallback` when the provider failed.
    pub fn reply_or(self, fallback: &str) -> (String, i64) {
        match self {
            TurnOutcome::Replied {
                reply,
                conversation_id,
            } => (reply, conversation_id),
            TurnOutcome::ProviderFailed {
                conversation_id, ..
            } => (fallback.to_string(), conversation_id),
        }
    }
}

/// Coordinates storage and the completion provider for chat turns.
pub struct ChatOrchestrator {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    provider: Arc<dyn ProviderAdapter + Send + Sync>,
    system_prompt: String,
    settings: CompletionSettings,
}

impl ChatOrchestrator {
    pub fn new(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
        system_prompt: String,
        settings: CompletionSettings,
    ) -> Self {
        Self {
            storage,
            provider,
            system_prompt,
            settings,
        }
    }

    /// The storage this orchestrator writes to.
    pub fn storage(&self) -> &Arc<dyn StorageAdapter + Send + Sync> {
        &self.storage
    }

    /// Runs one turn for `user_id`.
    ///
    /// Without `conversation_id` a new conversation is created. A supplied id
    /// that does not exist, or belongs to another user, yields `NotFound`.
    /// A blank message yields `Validation` and nothing is stored. Provider
    /// failures are not errors here; they come back as
    /// [`TurnOutcome::ProviderFailed`].
    pub async fn handle_turn(
        &self,
        user_id: &str,
        message: &str,
        conversation_id: Option<i64>,
    ) -> Result<TurnOutcome, ParleyError> {
        if message.trim().is_empty() {
            return Err(ParleyError::Validation("message must not be empty".into()));
        }

        let conversation_id = match conversation_id {
            Some(id) => self.owned_conversation(user_id, id).await?,
            None => {
                let created = self.storage.create_conversation(user_id).await?;
                info!(conversation_id = created.id, user_id, "conversation created");
                created.id
            }
        };

        self.storage
            .save_message(conversation_id, Role::User, message)
            .await?;

        let history = self.storage.get_history(conversation_id).await?;
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ProviderMessage::system(self.system_prompt.as_str()));
        messages.extend(history.iter().map(ProviderMessage::from));

        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        debug!(
            conversation_id,
            history_len = history.len(),
            "requesting completion"
        );

        match self.provider.complete(request).await {
            Ok(response) => {
                self.storage
                    .save_message(conversation_id, Role::Assistant, &response.content)
                    .await?;
                Ok(TurnOutcome::Replied {
                    reply: response.content,
                    conversation_id,
                })
            }
            Err(error) => {
                warn!(conversation_id, error = %error, "provider failed, no reply stored");
                Ok(TurnOutcome::ProviderFailed {
                    conversation_id,
                    error,
                })
            }
        }
    }

    /// Returns `id` if it exists and belongs to `user_id`.
    async fn owned_conversation(&self, user_id: &str, id: i64) -> Result<i64, ParleyError> {
        match self.storage.get_conversation(id).await? {
            Some(conversation) if conversation.user_id == user_id => Ok(conversation.id),
            _ => Err(ParleyError::conversation_not_found(id)),
        }
    }
}
