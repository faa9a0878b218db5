// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types and the helpers that map SQLite rows onto them.
//!
//! The canonical types live in `parley-core` so they can cross adapter
//! boundaries; they are re-exported here for convenience.

use rusqlite::Row;
use rusqlite::types::Type;

pub use parley_core::types::{Conversation, ConversationSummary, Message, Role};

/// Maximum number of characters kept in a summary preview.
pub const PREVIEW_CHARS: usize = 100;

/// Preview shown for a conversation without any user message.
pub const EMPTY_PREVIEW: &str = "No messages yet";

/// Maps `id, user_id, created_at`.
pub(crate) fn conversation_from_row(row: &Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        user_id: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Maps `id, conversation_id, role, content, created_at`.
pub(crate) fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    let role: String = row.get(2)?;
    let role = role
        .parse::<Role>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(Message {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        role,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}
