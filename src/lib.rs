// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cuentas Console - Session & Authorization Gating Core
//!
//! This crate is the client-side core of the Cuentas administrative console.
//! It owns the session token for one console tab, decides on every
//! navigation whether the caller may see the requested page, and wraps every
//! privileged account-management call in a validate-then-execute policy
//! against the remote Cuentas authority.
//!
//! ## Modules
//!
//! - `session` - Token transport, session store, and token identity
//! - `routes` - Route classification and the known downstream systems
//! - `authority` - HTTP client for the remote Cuentas authority
//! - `guard` - The access guard (navigation gating, guarded calls)
//! - `validation` - Account form validation

pub mod authority;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod routes;
pub mod session;
pub mod telemetry;
pub mod validation;
