// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Parley backend.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Auth,
}

// --- Conversation domain ---

/// Author of a stored message.
///
/// Stored and serialized as the lowercase strings `user` and `assistant`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A thread grouping an ordered set of messages for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Conversation {
    /// Server-assigned identifier.
    pub id: i64,
    /// Owning user identifier.
    pub user_id: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A single immutable message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    /// Server-assigned identifier; increases with insertion order.
    pub id: i64,
    /// Owning conversation.
    pub conversation_id: i64,
    pub role: Role,
    pub content: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A conversation enriched with derived activity data for list views.
///
/// Never persisted; recomputed on every list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversationSummary {
    pub id: i64,
    pub user_id: String,
    pub created_at: String,
    pub message_count: i64,
    /// Timestamp of the newest message, if any.
    pub last_message_at: Option<String>,
    /// Leading text of the first user message.
    pub preview: String,
}

/// Conversation metadata together with its full ordered history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

// --- Provider types ---

/// A role/content pair in the provider's expected message format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// "system", "user", or "assistant".
    pub role: String,
    pub content: String,
}

impl ProviderMessage {
    /// A system instruction message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

impl From<&Message> for ProviderMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }
}

/// A request to a completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Model identifier.
    pub model: String,
    /// Ordered messages, system instruction first.
    pub messages: Vec<ProviderMessage>,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// A completed response from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Provider-assigned response ID.
    pub id: String,
    /// Generated text.
    pub content: String,
    /// Model that produced the response.
    pub model: String,
    /// Reason generation stopped, when reported.
    pub finish_reason: Option<String>,
    /// Token usage, when reported.
    pub usage: Option<TokenUsage>,
}

// --- Auth types ---

/// An opaque bearer credential to be verified.
#[derive(Clone)]
pub struct AuthToken(pub String);

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([redacted])")
    }
}

/// A verified identity resolved from a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Identifier that owns conversations.
    pub user_id: String,
    /// Human-readable username, when the token carries one.
    pub username: Option<String>,
}
