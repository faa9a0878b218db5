// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the conversation controller.

use thiserror::Error;

/// Errors surfaced by [`ConversationController`](crate::ConversationController)
/// and [`ChatBackend`](crate::ChatBackend) implementations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The message was empty or whitespace only. Nothing was sent.
    #[error("message must not be empty")]
    EmptyMessage,

    /// A send is already in flight.
    #[error("a message is already being sent")]
    Busy,

    /// The server rejected the request with a status and error message.
    #[error("server returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The server could not be reached or returned an unreadable response.
    #[error("backend error: {0}")]
    Backend(String),
}

impl ClientError {
    /// Returns true for a 404 from the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 404, .. })
    }
}
