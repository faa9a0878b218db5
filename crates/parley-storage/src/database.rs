// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle: connection setup, PRAGMAs, migrations, and shutdown.
//!
//! Every statement runs on the single background thread owned by the
//! `tokio-rusqlite` connection held here. Query modules take `&Database`
//! and never open connections of their own.

use std::path::Path;
use std::time::Duration;

use parley_core::ParleyError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations::run_migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Converts a tokio-rusqlite failure into [`ParleyError::Storage`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> ParleyError {
    ParleyError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file at `path` in WAL mode.
    pub async fn open(path: &str) -> Result<Self, ParleyError> {
        Self::open_with(path, true).await
    }

    /// Opens the database file at `path`, choosing the journal mode.
    ///
    /// Missing parent directories are created.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, ParleyError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ParleyError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| ParleyError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Opens a private in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, ParleyError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| ParleyError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    /// Applies connection PRAGMAs and runs pending migrations.
    async fn prepare(&self, wal_mode: bool) -> Result<(), ParleyError> {
        self.conn
            .call(move |conn| -> Result<Result<(), ParleyError>, rusqlite::Error> {
                if wal_mode {
                    let mode: String = conn.pragma_update_and_check(
                        None,
                        "journal_mode",
                        "WAL",
                        |row| row.get(0),
                    )?;
                    debug!(journal_mode = %mode, "journal mode set");
                    conn.pragma_update(None, "synchronous", "NORMAL")?;
                }
                conn.pragma_update(None, "foreign_keys", true)?;
                conn.busy_timeout(BUSY_TIMEOUT)?;
                Ok(run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)?
    }

    /// The underlying single-writer connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Truncates the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), ParleyError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoints and closes the connection.
    pub async fn close(self) -> Result<(), ParleyError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(|e| ParleyError::Storage {
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("parley.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());

        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>();
                names
            })
            .await
            .unwrap();
        assert!(tables.contains(&"conversations".to_string()));
        assert!(tables.contains(&"messages".to_string()));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn wal_mode_is_enabled_on_file_databases() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("wal.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let mode: String = db
            .connection()
            .call(|conn| conn.query_row("PRAGMA journal_mode", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = Database::open_in_memory().await.unwrap();
        let enabled: i64 = db
            .connection()
            .call(|conn| conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn reopening_does_not_reapply_migrations() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();

        Database::open(path).await.unwrap().close().await.unwrap();
        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();
    }
}
