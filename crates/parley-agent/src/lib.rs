// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat orchestration for Parley.
//!
//! [`ChatOrchestrator`] runs a single chat turn against the storage and
//! provider adapters. [`shutdown`] turns process signals into a
//! cancellation token for the server.

pub mod orchestrator;
pub mod prompt;
pub mod shutdown;

pub use orchestrator::{ChatOrchestrator, CompletionSettings, TurnOutcome};
pub use prompt::load_system_prompt;
pub use shutdown::install_signal_handler;
