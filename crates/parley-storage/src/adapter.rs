// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use parley_config::model::StorageConfig;
use parley_core::types::{Conversation, ConversationSummary, Message, Role};
use parley_core::{AdapterType, HealthStatus, ParleyError, PluginAdapter, StorageAdapter};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other
/// operation fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, ParleyError> {
        self.db.get().ok_or_else(|| ParleyError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ParleyError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ParleyError::Storage {
            source: "storage already initialized".into(),
        })?;
        info!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ParleyError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn create_conversation(&self, user_id: &str) -> Result<Conversation, ParleyError> {
        queries::conversations::create_conversation(self.db()?, user_id).await
    }

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>, ParleyError> {
        queries::conversations::get_conversation(self.db()?, id).await
    }

    async fn save_message(
        &self,
        conversation_id: i64,
        role: Role,
        content: &str,
    ) -> Result<Message, ParleyError> {
        queries::messages::save_message(self.db()?, conversation_id, role, content).await
    }

    async fn get_history(&self, conversation_id: i64) -> Result<Vec<Message>, ParleyError> {
        queries::messages::get_history(self.db()?, conversation_id).await
    }

    async fn list_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConversationSummary>, ParleyError> {
        queries::conversations::list_conversations(self.db()?, user_id).await
    }

    async fn delete_conversation(&self, conversation_id: i64) -> Result<(), ParleyError> {
        queries::conversations::delete_conversation(self.db()?, conversation_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_identity() {
        let storage = SqliteStorage::new(make_config("unused.db"));
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists());
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        assert!(storage.create_conversation("alice").await.is_err());
        // Nothing to flush yet.
        storage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn full_conversation_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);

        let conv = storage.create_conversation("alice").await.unwrap();
        storage
            .save_message(conv.id, Role::User, "hello")
            .await
            .unwrap();
        storage
            .save_message(conv.id, Role::Assistant, "hi there")
            .await
            .unwrap();

        let history = storage.get_history(conv.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);

        let list = storage.list_conversations("alice").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].message_count, 2);
        assert_eq!(list[0].preview, "hello");

        storage.delete_conversation(conv.id).await.unwrap();
        assert!(storage.get_conversation(conv.id).await.unwrap().is_none());
        assert!(storage.list_conversations("alice").await.unwrap().is_empty());

        storage.close().await.unwrap();
        storage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("persist.db");
        let path = db_path.to_str().unwrap();

        let first = SqliteStorage::new(make_config(path));
        first.initialize().await.unwrap();
        let conv = first.create_conversation("alice").await.unwrap();
        first.save_message(conv.id, Role::User, "kept").await.unwrap();
        first.shutdown().await.unwrap();

        let second = SqliteStorage::new(make_config(path));
        second.initialize().await.unwrap();
        let history = second.get_history(conv.id).await.unwrap();
        assert_eq!(history[0].content, "kept");
    }
}
