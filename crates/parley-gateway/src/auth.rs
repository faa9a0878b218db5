// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer authentication middleware.
//!
//! Every protected route requires `Authorization: Bearer <token>`. The token
//! is resolved by the configured [`AuthAdapter`] and the resulting
//! [`AuthIdentity`] is attached to the request as an extension. Anything
//! else is rejected with 401 (fail-closed).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use parley_core::{AuthAdapter, AuthIdentity, AuthToken, PluginAdapter};

use crate::error::ApiError;

/// Shared handle to the auth adapter used by the middleware.
#[derive(Clone)]
pub struct AuthState {
    pub adapter: Arc<dyn AuthAdapter + Send + Sync>,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("adapter", &self.adapter.name())
            .finish()
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively. Returns `None` for other
/// schemes and for an empty token.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that authenticates the caller and inserts [`AuthIdentity`].
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
    else {
        return Err(ApiError::unauthorized("missing bearer token"));
    };

    let identity: AuthIdentity = match auth
        .adapter
        .authenticate(&AuthToken(token.to_string()))
        .await
    {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!(error = %e, "bearer token rejected");
            return Err(ApiError::unauthorized("invalid or expired token"));
        }
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
