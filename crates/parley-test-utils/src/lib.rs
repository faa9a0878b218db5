// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley integration tests.
//!
//! - [`MockProvider`]: scripted completion provider with request capture
//! - [`temp_storage`]: initialized SQLite storage in a temp directory
//! - [`bearer_for`]: signed `Authorization` header values

pub mod helpers;
pub mod mock_provider;

pub use helpers::{TEST_JWT_SECRET, bearer_for, temp_storage, token_for};
pub use mock_provider::MockProvider;
