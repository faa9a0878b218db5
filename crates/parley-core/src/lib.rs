// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parley chat backend.
//!
//! This crate provides the trait definitions, error types, and domain types
//! shared by every other Parley crate. Storage, provider, and auth adapters
//! implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParleyError;
pub use types::{
    AdapterType, AuthIdentity, AuthToken, Conversation, ConversationDetail, ConversationSummary,
    HealthStatus, Message, ProviderMessage, ProviderRequest, ProviderResponse, Role, TokenUsage,
};

pub use traits::{AuthAdapter, PluginAdapter, ProviderAdapter, StorageAdapter};
