// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for conversations and messages.

pub mod conversations;
pub mod messages;

use rusqlite::{Connection, OptionalExtension, params};

/// Returns true if a conversation row with this id exists.
pub(crate) fn conversation_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM conversations WHERE id = ?1",
        params![id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}
