// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations using refinery.
//!
//! SQL files under `migrations/` are compiled in via `embed_migrations!` and
//! applied every time a [`Database`](crate::Database) is opened.

use parley_core::ParleyError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies all pending migrations.
///
/// Applied versions are tracked in refinery's `refinery_schema_history` table,
/// so running this against an up-to-date database is a no-op.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), ParleyError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| ParleyError::Storage {
            source: Box::new(e),
        })?;
    for migration in report.applied_migrations() {
        tracing::info!(version = migration.version(), name = migration.name(), "applied migration");
    }
    Ok(())
}
