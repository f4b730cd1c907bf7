// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy of the gating core.
//!
//! Navigation-facing kinds (`Unauthenticated`, `InvalidOrExpiredToken`,
//! `Unauthorized`) are consumed by the access guard itself and converted
//! into redirect verdicts with a cleared session; they only escape as raw
//! values from the login and data-fetch surfaces. `Validation` is returned
//! synchronously and blocks the network call entirely. `Conflict` is
//! surfaced verbatim to the UI shell.

use thiserror::Error;

use crate::validation::FormError;

/// Failure kinds produced by the gating core.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// No session token is present.
    #[error("no session token is present")]
    Unauthenticated,

    /// A token is present but the authority rejected it.
    ///
    /// Network failure during token validation folds into this kind as well;
    /// the caller cannot distinguish "expired" from "unreachable" and must
    /// treat both as "cannot proceed".
    #[error("session token is invalid or expired")]
    InvalidOrExpiredToken,

    /// The token is valid but the account lacks the required system grant.
    #[error("account lacks the required system grant")]
    Unauthorized,

    /// The authority rejected the submitted credentials at login.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// A form failed client-side validation; nothing was submitted.
    #[error(transparent)]
    Validation(#[from] FormError),

    /// An account with the submitted email already exists.
    #[error("an account with this email already exists")]
    Conflict,

    /// The authority could not be reached or the transport failed mid-flight.
    #[error("authority request failed: {0}")]
    Network(String),

    /// The authority answered with a status the console has no mapping for.
    #[error("authority returned unexpected status {0}")]
    Remote(u16),
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        ConsoleError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_their_message() {
        let err = ConsoleError::from(FormError::MissingFields);
        assert_eq!(err.to_string(), FormError::MissingFields.to_string());
    }

    #[test]
    fn conflict_has_a_distinct_user_visible_message() {
        assert_eq!(
            ConsoleError::Conflict.to_string(),
            "an account with this email already exists"
        );
    }
}
