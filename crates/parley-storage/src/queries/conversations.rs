// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation create, lookup, listing, and deletion.

use parley_core::ParleyError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::{
    Conversation, ConversationSummary, EMPTY_PREVIEW, PREVIEW_CHARS, conversation_from_row,
};

/// Create an empty conversation owned by `user_id`.
pub async fn create_conversation(db: &Database, user_id: &str) -> Result<Conversation, ParleyError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "INSERT INTO conversations (user_id) VALUES (?1)
                 RETURNING id, user_id, created_at",
                params![user_id],
                conversation_from_row,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Get a conversation by id.
pub async fn get_conversation(db: &Database, id: i64) -> Result<Option<Conversation>, ParleyError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, user_id, created_at FROM conversations WHERE id = ?1",
                params![id],
                conversation_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// List a user's conversations with derived activity data, most recent first.
///
/// Activity is the newest message timestamp, or the creation time for an
/// empty conversation. Timestamps tie within a millisecond, so ties go to
/// the conversation holding the newest message id, then to the newer id.
pub async fn list_conversations(
    db: &Database,
    user_id: &str,
) -> Result<Vec<ConversationSummary>, ParleyError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.user_id, c.created_at,
                        COUNT(m.id),
                        MAX(m.created_at),
                        (SELECT SUBSTR(f.content, 1, ?2) FROM messages f
                          WHERE f.conversation_id = c.id AND f.role = 'user'
                          ORDER BY f.id ASC LIMIT 1)
                 FROM conversations c
                 LEFT JOIN messages m ON m.conversation_id = c.id
                 WHERE c.user_id = ?1
                 GROUP BY c.id
                 ORDER BY COALESCE(MAX(m.created_at), c.created_at) DESC, MAX(m.id) DESC, c.id DESC",
            )?;
            let rows = stmt.query_map(params![user_id, PREVIEW_CHARS as i64], |row| {
                let preview: Option<String> = row.get(5)?;
                Ok(ConversationSummary {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    created_at: row.get(2)?,
                    message_count: row.get(3)?,
                    last_message_at: row.get(4)?,
                    preview: preview.unwrap_or_else(|| EMPTY_PREVIEW.to_string()),
                })
            })?;
            let mut summaries = Vec::new();
            for row in rows {
                summaries.push(row?);
            }
            Ok(summaries)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a conversation and its messages in one transaction.
///
/// Returns `NotFound` if no conversation had this id.
pub async fn delete_conversation(db: &Database, id: i64) -> Result<(), ParleyError> {
    let removed = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM messages WHERE conversation_id = ?1",
                params![id],
            )?;
            let removed = tx.execute("DELETE FROM conversations WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)?;

    if removed == 0 {
        return Err(ParleyError::conversation_not_found(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::queries::messages::{get_history, save_message};

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_and_timestamp() {
        let db = setup_db().await;
        let a = create_conversation(&db, "alice").await.unwrap();
        let b = create_conversation(&db, "alice").await.unwrap();

        assert!(b.id > a.id);
        assert_eq!(a.user_id, "alice");
        // e.g. 2026-01-01T12:34:56.789Z
        assert_eq!(a.created_at.len(), 24);
        assert!(a.created_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn get_conversation_round_trip_and_missing() {
        let db = setup_db().await;
        let created = create_conversation(&db, "alice").await.unwrap();

        let found = get_conversation(&db, created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(get_conversation(&db, 9999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_is_scoped_to_user_and_summarized() {
        let db = setup_db().await;
        let mine = create_conversation(&db, "alice").await.unwrap();
        create_conversation(&db, "bob").await.unwrap();

        save_message(&db, mine.id, Role::User, "first question")
            .await
            .unwrap();
        save_message(&db, mine.id, Role::Assistant, "an answer")
            .await
            .unwrap();
        save_message(&db, mine.id, Role::User, "second question")
            .await
            .unwrap();

        let list = list_conversations(&db, "alice").await.unwrap();
        assert_eq!(list.len(), 1);
        let summary = &list[0];
        assert_eq!(summary.id, mine.id);
        assert_eq!(summary.message_count, 3);
        assert_eq!(summary.preview, "first question");
        assert!(summary.last_message_at.is_some());
    }

    #[tokio::test]
    async fn empty_conversation_has_placeholder_preview() {
        let db = setup_db().await;
        create_conversation(&db, "alice").await.unwrap();

        let list = list_conversations(&db, "alice").await.unwrap();
        assert_eq!(list[0].message_count, 0);
        assert_eq!(list[0].preview, EMPTY_PREVIEW);
        assert_eq!(list[0].last_message_at, None);
    }

    #[tokio::test]
    async fn preview_is_truncated_by_characters() {
        let db = setup_db().await;
        let conv = create_conversation(&db, "alice").await.unwrap();
        let long: String = "é".repeat(150);
        save_message(&db, conv.id, Role::User, &long).await.unwrap();

        let list = list_conversations(&db, "alice").await.unwrap();
        assert_eq!(list[0].preview.chars().count(), PREVIEW_CHARS);
    }

    #[tokio::test]
    async fn list_orders_by_latest_activity() {
        let db = setup_db().await;
        let older = create_conversation(&db, "alice").await.unwrap();
        let newer = create_conversation(&db, "alice").await.unwrap();

        // Newest conversation first while both are empty (id tie-break).
        let list = list_conversations(&db, "alice").await.unwrap();
        assert_eq!(list[0].id, newer.id);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        save_message(&db, older.id, Role::User, "bump").await.unwrap();

        let list = list_conversations(&db, "alice").await.unwrap();
        assert_eq!(list[0].id, older.id);
        assert_eq!(list[1].id, newer.id);
    }

    #[tokio::test]
    async fn same_millisecond_activity_orders_by_latest_message() {
        let db = setup_db().await;
        let older = create_conversation(&db, "alice").await.unwrap();
        let newer = create_conversation(&db, "alice").await.unwrap();

        for _ in 0..20 {
            save_message(&db, newer.id, Role::User, "ping").await.unwrap();
            save_message(&db, older.id, Role::User, "pong").await.unwrap();
            let list = list_conversations(&db, "alice").await.unwrap();
            assert_eq!(list[0].id, older.id);

            save_message(&db, older.id, Role::User, "ping").await.unwrap();
            save_message(&db, newer.id, Role::User, "pong").await.unwrap();
            let list = list_conversations(&db, "alice").await.unwrap();
            assert_eq!(list[0].id, newer.id);
        }
    }

    #[tokio::test]
    async fn delete_removes_conversation_and_messages() {
        let db = setup_db().await;
        let conv = create_conversation(&db, "alice").await.unwrap();
        save_message(&db, conv.id, Role::User, "hello").await.unwrap();
        save_message(&db, conv.id, Role::Assistant, "hi").await.unwrap();

        delete_conversation(&db, conv.id).await.unwrap();

        assert_eq!(get_conversation(&db, conv.id).await.unwrap(), None);
        let err = get_history(&db, conv.id).await.unwrap_err();
        assert!(err.is_not_found());

        let orphans: i64 = db
            .connection()
            .call(move |conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM messages WHERE conversation_id = ?1",
                    params![conv.id],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let db = setup_db().await;
        let err = delete_conversation(&db, 42).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
