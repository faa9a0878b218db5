// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Parley.
//!
//! Conversations and their messages live in a WAL-mode SQLite database with
//! embedded migrations. All statements are serialized through the single
//! background thread of a `tokio-rusqlite` connection.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use models::*;
