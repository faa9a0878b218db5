// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message append and history retrieval.

use parley_core::ParleyError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{Message, Role, message_from_row};
use crate::queries::conversation_exists;

/// Append a message to a conversation.
///
/// Returns `NotFound` if the conversation does not exist.
pub async fn save_message(
    db: &Database,
    conversation_id: i64,
    role: Role,
    content: &str,
) -> Result<Message, ParleyError> {
    let content = content.to_string();
    let saved = db
        .connection()
        .call(move |conn| {
            if !conversation_exists(conn, conversation_id)? {
                return Ok(None);
            }
            conn.query_row(
                "INSERT INTO messages (conversation_id, role, content) VALUES (?1, ?2, ?3)
                 RETURNING id, conversation_id, role, content, created_at",
                params![conversation_id, role.as_str(), content],
                message_from_row,
            )
            .map(Some)
        })
        .await
        .map_err(map_tr_err)?;

    saved.ok_or_else(|| ParleyError::conversation_not_found(conversation_id))
}

/// Get every message of a conversation in insertion order.
///
/// Returns `NotFound` if the conversation does not exist.
pub async fn get_history(db: &Database, conversation_id: i64) -> Result<Vec<Message>, ParleyError> {
    let history = db
        .connection()
        .call(move |conn| {
            if !conversation_exists(conn, conversation_id)? {
                return Ok(None);
            }
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, role, content, created_at
                 FROM messages WHERE conversation_id = ?1
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![conversation_id], message_from_row)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(Some(messages))
        })
        .await
        .map_err(map_tr_err)?;

    history.ok_or_else(|| ParleyError::conversation_not_found(conversation_id))
}
