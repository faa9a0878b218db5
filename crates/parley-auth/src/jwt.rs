// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compact HS256 JSON Web Token encoding and verification.
//!
//! Only `HS256` is accepted. Tokens must carry an `exp` claim, and the
//! signature is compared in constant time before any claim is trusted.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use parley_core::ParleyError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// A user id claim; issuers emit either a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserIdClaim {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for UserIdClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserIdClaim::Text(s) => f.write_str(s),
            UserIdClaim::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Registered and private claims read from a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject; the username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Stable user identifier, preferred over `sub` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserIdClaim>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

fn reject(reason: impl Into<String>) -> ParleyError {
    ParleyError::Auth(reason.into())
}

fn mac_for(secret: &[u8]) -> Result<HmacSha256, ParleyError> {
    HmacSha256::new_from_slice(secret)
        .map_err(|e| ParleyError::Internal(format!("invalid HMAC key: {e}")))
}

/// Signs `claims` with `secret` and returns a compact token.
pub fn sign_claims(secret: &[u8], claims: &Claims) -> Result<String, ParleyError> {
    let header = Header {
        alg: ALGORITHM.to_string(),
        typ: Some("JWT".to_string()),
    };
    let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(claims)?);

    let mut mac = mac_for(secret)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{signing_input}.{signature}"))
}

/// Verifies signature, algorithm, and expiry, then returns the claims.
///
/// `now` is the current Unix time in seconds; `leeway` extends `exp`.
pub fn verify(secret: &[u8], token: &str, now: i64, leeway: i64) -> Result<Claims, ParleyError> {
    let mut parts = token.split('.');
    let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(reject("malformed token"));
    };

    let header: Header = decode_segment(header_b64)?;
    if header.alg != ALGORITHM {
        return Err(reject(format!("unsupported algorithm `{}`", header.alg)));
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| reject("malformed token signature"))?;
    let mut mac = mac_for(secret)?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(claims_b64.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| reject("invalid token signature"))?;

    let claims: Claims = decode_segment(claims_b64)?;
    match claims.exp {
        None => Err(reject("token has no expiry")),
        Some(exp) if exp.saturating_add(leeway) < now => Err(reject("token expired")),
        Some(_) => Ok(claims),
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, ParleyError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| reject("malformed token encoding"))?;
    serde_json::from_slice(&bytes).map_err(|_| reject("malformed token payload"))
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, ParleyError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| ParleyError::Internal(format!("failed to encode token: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
