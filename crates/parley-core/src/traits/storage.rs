// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for conversation persistence backends.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Conversation, ConversationSummary, Message, Role};

/// Adapter for conversation and message persistence.
///
/// Ownership checks are not performed here; callers that act on behalf of a
/// user compare [`Conversation::user_id`] before mutating.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (connection, PRAGMAs, migrations).
    async fn initialize(&self) -> Result<(), ParleyError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), ParleyError>;

    /// Creates a new, empty conversation owned by `user_id`.
    async fn create_conversation(&self, user_id: &str) -> Result<Conversation, ParleyError>;

    /// Looks up conversation metadata.
    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>, ParleyError>;

    /// Appends a message. Fails with `NotFound` if the conversation does not exist.
    async fn save_message(
        &self,
        conversation_id: i64,
        role: Role,
        content: &str,
    ) -> Result<Message, ParleyError>;

    /// Returns every message of a conversation in insertion order.
    ///
    /// An existing conversation without messages yields an empty vector;
    /// a missing conversation yields `NotFound`.
    async fn get_history(&self, conversation_id: i64) -> Result<Vec<Message>, ParleyError>;

    /// Lists the user's conversations, most recently active first.
    async fn list_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConversationSummary>, ParleyError>;

    /// Removes a conversation and all of its messages atomically.
    async fn delete_conversation(&self, conversation_id: i64) -> Result<(), ParleyError>;
}
