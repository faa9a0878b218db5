// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage and token fixtures.

use parley_config::model::StorageConfig;
use parley_core::{ParleyError, StorageAdapter};
use parley_storage::SqliteStorage;
use tempfile::TempDir;

/// Secret shared by fixtures that mint and verify test tokens.
pub const TEST_JWT_SECRET: &str = "parley-test-secret";

/// An initialized [`SqliteStorage`] in a fresh temp directory.
///
/// Keep the returned [`TempDir`] alive for as long as the storage is used.
pub async fn temp_storage() -> Result<(SqliteStorage, TempDir), ParleyError> {
    let dir = tempfile::tempdir().map_err(|e| ParleyError::Storage {
        source: Box::new(e),
    })?;
    let storage = SqliteStorage::new(StorageConfig {
        database_path: dir.path().join("parley-test.db").display().to_string(),
        wal_mode: true,
    });
    storage.initialize().await?;
    Ok((storage, dir))
}

/// A signed token for `user`, valid for one hour.
pub fn token_for(secret: &str, user: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    parley_auth::sign_token(secret.as_bytes(), user, None, exp)
        .unwrap_or_else(|e| panic!("failed to sign test token: {e}"))
}

/// An `Authorization` header value carrying a token for `user`.
pub fn bearer_for(secret: &str, user: &str) -> String {
    format!("Bearer {}", token_for(secret, user))
}
