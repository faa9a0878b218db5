// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token authentication for Parley.
//!
//! [`JwtAuth`] implements [`AuthAdapter`] for HS256-signed JWTs. The
//! resolved identity uses the `user_id` claim when present and falls back
//! to `sub`. Token issuance lives elsewhere; [`sign_token`] exists for
//! tooling and tests.

pub mod jwt;

use async_trait::async_trait;
use tracing::debug;

use parley_config::model::AuthConfig;
use parley_core::traits::{AuthAdapter, PluginAdapter};
use parley_core::types::{AdapterType, AuthIdentity, AuthToken, HealthStatus};
use parley_core::ParleyError;

pub use jwt::{Claims, UserIdClaim};

/// HS256 JWT authentication adapter.
pub struct JwtAuth {
    secret: Vec<u8>,
    leeway_secs: i64,
}

impl std::fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth")
            .field("secret", &"[redacted]")
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

impl JwtAuth {
    /// Creates an adapter for `secret` with the given clock-skew allowance.
    pub fn new(secret: impl Into<Vec<u8>>, leeway_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            leeway_secs: i64::try_from(leeway_secs).unwrap_or(i64::MAX),
        }
    }

    /// Creates an adapter from configuration.
    ///
    /// Fails when `auth.jwt_secret` is unset or empty, so the server never
    /// starts with authentication disabled.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ParleyError> {
        match config.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(Self::new(secret, config.leeway_secs)),
            _ => Err(ParleyError::Config(
                "auth.jwt_secret is required (set it in parley.toml or PARLEY_JWT_SECRET)".into(),
            )),
        }
    }

    /// Verifies `token` at `now` (Unix seconds) and resolves its identity.
    pub fn identify(&self, token: &str, now: i64) -> Result<AuthIdentity, ParleyError> {
        let claims = jwt::verify(&self.secret, token, now, self.leeway_secs)?;
        identity_from_claims(claims)
    }
}

fn identity_from_claims(claims: Claims) -> Result<AuthIdentity, ParleyError> {
    let user_id = claims
        .user_id
        .map(|id| id.to_string())
        .or_else(|| claims.sub.clone())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ParleyError::Auth("token carries no user identity".into()))?;
    Ok(AuthIdentity {
        user_id,
        username: claims.sub,
    })
}

/// Signs a token for `sub` expiring at `exp`, optionally with a `user_id` claim.
pub fn sign_token(
    secret: &[u8],
    sub: &str,
    user_id: Option<UserIdClaim>,
    exp: i64,
) -> Result<String, ParleyError> {
    jwt::sign_claims(
        secret,
        &Claims {
            sub: Some(sub.to_string()),
            user_id,
            exp: Some(exp),
        },
    )
}

#[async_trait]
impl PluginAdapter for JwtAuth {
    fn name(&self) -> &str {
        "jwt-hs256"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for JwtAuth {
    async fn authenticate(&self, token: &AuthToken) -> Result<AuthIdentity, ParleyError> {
        let result = self.identify(&token.0, chrono::Utc::now().timestamp());
        if let Err(e) = &result {
            debug!(error = %e, "bearer token rejected");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn future() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[tokio::test]
    async fn user_id_claim_wins_over_sub() {
        let auth = JwtAuth::new(SECRET, 0);
        let token = sign_token(
            SECRET.as_bytes(),
            "alice",
            Some(UserIdClaim::Number(7)),
            future(),
        )
        .unwrap();

        let identity = auth.authenticate(&AuthToken(token)).await.unwrap();
        assert_eq!(identity.user_id, "7");
        assert_eq!(identity.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn sub_is_used_without_user_id() {
        let auth = JwtAuth::new(SECRET, 0);
        let token = sign_token(SECRET.as_bytes(), "bob", None, future()).unwrap();

        let identity = auth.authenticate(&AuthToken(token)).await.unwrap();
        assert_eq!(identity.user_id, "bob");
    }

    #[tokio::test]
    async fn expired_token_is_auth_error() {
        let auth = JwtAuth::new(SECRET, 0);
        let past = chrono::Utc::now().timestamp() - 120;
        let token = sign_token(SECRET.as_bytes(), "bob", None, past).unwrap();

        let err = auth.authenticate(&AuthToken(token)).await.unwrap_err();
        assert!(matches!(err, ParleyError::Auth(_)));
    }

    #[test]
    fn identity_requires_some_subject() {
        let claims = Claims {
            sub: None,
            user_id: None,
            exp: Some(1),
        };
        assert!(identity_from_claims(claims).is_err());
    }

    #[test]
    fn from_config_requires_secret() {
        let mut config = AuthConfig::default();
        assert!(JwtAuth::from_config(&config).is_err());
        config.jwt_secret = Some(String::new());
        assert!(JwtAuth::from_config(&config).is_err());
        config.jwt_secret = Some("s".into());
        assert!(JwtAuth::from_config(&config).is_ok());
    }

    #[test]
    fn debug_hides_secret() {
        let auth = JwtAuth::new(SECRET, 5);
        let debug = format!("{auth:?}");
        assert!(!debug.contains(SECRET));
        assert_eq!(auth.name(), "jwt-hs256");
    }
}
