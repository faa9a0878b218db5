// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parley chat backend.

use thiserror::Error;

/// The primary error type used across all Parley adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (invalid TOML, missing secrets, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request validation errors (empty message, malformed payload).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist (or is not visible to the caller).
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// Missing, malformed, or rejected credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Completion provider errors (API failure, rate limit, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// Shorthand for a missing conversation.
    pub fn conversation_not_found(id: i64) -> Self {
        ParleyError::NotFound {
            resource: "conversation",
            id: id.to_string(),
        }
    }

    /// Returns true if this error is the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ParleyError::NotFound { .. })
    }
}
