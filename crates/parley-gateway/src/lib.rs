// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated HTTP API for Parley.
//!
//! Exposes chat turns and conversation history over JSON. Every route except
//! the health probes and the OpenAPI document sits behind bearer
//! authentication, and all conversation access is scoped to the caller.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use openapi::ApiDoc;
pub use server::{GatewayState, build_router, start_server};
