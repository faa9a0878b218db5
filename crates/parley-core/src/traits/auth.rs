// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait for identity verification.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AuthIdentity, AuthToken};

/// Adapter for authenticating bearer tokens.
///
/// Resolves a token into the opaque identity that owns conversations.
/// Rejections are reported as [`ParleyError::Auth`].
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Authenticates the given token and returns the verified identity.
    async fn authenticate(&self, token: &AuthToken) -> Result<AuthIdentity, ParleyError>;
}
