// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Module
//!
//! Ownership of the per-tab session: the key/value transport the token
//! survives a reload in, the injectable session store, and the identity
//! hints decoded from the token payload.
//!
//! ## Lifecycle
//!
//! 1. The UI shell constructs a [`SessionStore`] at tab start; any token
//!    already present in the transport is adopted.
//! 2. A successful login installs a new session through the store.
//! 3. The session is destroyed on explicit logout, on a failed token
//!    validation, or on a denied authorization. `clear` is idempotent, so a
//!    late-completing call after navigation-away is harmless.

pub mod claims;
pub mod store;
pub mod transport;

pub use claims::Identity;
pub use store::{Session, SessionStore};
pub use transport::{InMemoryTransport, KeyValueTransport};
