// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side conversation state for Parley chat frontends.
//!
//! [`ConversationController`] owns the UI-facing state and talks to the
//! server through the [`ChatBackend`] trait, which embedding applications
//! implement over their HTTP client of choice.

pub mod backend;
pub mod controller;
pub mod error;

pub use backend::{ChatBackend, ChatReply};
pub use controller::{
    ChatEntry, ClientConfig, ControllerState, ConversationController, DEFAULT_FALLBACK,
};
pub use error::ClientError;
