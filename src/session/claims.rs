// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity hints decoded from the session token.
//!
//! The token is opaque to the console in the contractual sense: the
//! authority is the only verifier, and every privileged call is re-validated
//! remotely. The payload is still a JWT, and the console reads it without
//! checking the signature to learn who is signed in and when the token
//! lapses. A token whose payload cannot be decoded is kept as a bare
//! credential with no identity attached.

use serde::Deserialize;

/// Payload claims carried by a Cuentas session token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Account id of the signed-in user.
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Username (subject).
    #[serde(default)]
    pub sub: String,

    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: i64,
}

/// Identity the store keeps next to the raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    /// Unix timestamp after which the authority will reject the token.
    pub expires_at: i64,
}

/// Decode the token payload without verifying the signature.
///
/// Returns `None` when the token is not a decodable JWT; callers treat that
/// as "credential present, identity unknown".
pub fn decode_identity(token: &str) -> Option<Identity> {
    let data = jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token).ok()?;
    Some(Identity {
        user_id: data.claims.user_id,
        expires_at: data.claims.exp,
    })
}
