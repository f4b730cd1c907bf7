// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-tab key/value transport for the session token.
//!
//! The transport is deliberately narrow: the core reads and writes exactly
//! one key and never touches any other persisted state. A browser shell
//! backs this with the tab's session storage; tests and headless embedders
//! use the in-memory implementation.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Key under which the session token lives in the transport.
pub const TOKEN_KEY: &str = "token";

/// Opaque per-tab key/value store.
pub trait KeyValueTransport: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Transport held entirely in memory; dies with the tab.
#[derive(Default)]
pub struct InMemoryTransport {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueTransport for InMemoryTransport {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}
