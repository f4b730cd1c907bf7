// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Injectable session store.
//!
//! One store per console tab, shared by reference between the access guard
//! and the UI shell. The store owns the `Option<Session>`: absence IS the
//! unauthenticated state, so a stale identity can never outlive its token.
//! Reads are synchronous because the navigation state machine must run
//! without a network or executor round trip.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::claims::{self, Identity};
use super::transport::{KeyValueTransport, TOKEN_KEY};

/// The current session: raw token plus identity hints decoded from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    /// `None` when the token payload could not be decoded.
    pub identity: Option<Identity>,
}

/// Owner of the session for one console tab.
///
/// The lock satisfies the multi-threaded porting note: within a tab there is
/// a single logical writer, but embedders running the guard off the UI
/// thread get serialized mutation for free.
#[derive(Clone)]
pub struct SessionStore {
    transport: Arc<dyn KeyValueTransport>,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Create a store over the given transport, adopting any token already
    /// present (a reload within the same tab).
    pub fn new(transport: Arc<dyn KeyValueTransport>) -> Self {
        let current = transport.get(TOKEN_KEY).map(|token| Session {
            identity: claims::decode_identity(&token),
            token,
        });
        Self {
            transport,
            current: Arc::new(RwLock::new(current)),
        }
    }

    /// Snapshot of the current session; `None` means unauthenticated.
    pub fn get(&self) -> Option<Session> {
        self.current.read().clone()
    }

    /// The raw token, if a session exists.
    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Install a new session, writing the token through to the transport.
    pub fn set(&self, token: impl Into<String>, identity: Option<Identity>) {
        let token = token.into();
        self.transport.set(TOKEN_KEY, &token);
        *self.current.write() = Some(Session { token, identity });
    }

    /// Destroy the session. Idempotent; no network or UI side effects.
    pub fn clear(&self) {
        self.transport.remove(TOKEN_KEY);
        if self.current.write().take().is_some() {
            debug!("session cleared");
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Arc::new(super::transport::InMemoryTransport::new()))
    }
}
