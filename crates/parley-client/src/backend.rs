// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The server-facing seam of the controller.

use async_trait::async_trait;
use parley_core::{ConversationDetail, ConversationSummary};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Reply to a chat turn, as returned by `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: i64,
}

/// Authenticated access to the Parley HTTP API on behalf of one user.
///
/// Implementations carry their own credentials; the controller never sees
/// tokens.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `POST /chat`.
    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<i64>,
    ) -> Result<ChatReply, ClientError>;

    /// `GET /conversations/{id}/full`.
    async fn fetch_conversation(&self, id: i64) -> Result<ConversationDetail, ClientError>;

    /// `DELETE /conversations/{id}`.
    async fn delete_conversation(&self, id: i64) -> Result<(), ClientError>;

    /// `GET /conversations`.
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ClientError>;
}
