// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the crate. Configuration is loaded from the environment when
//! the authority client is constructed.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CUENTAS_API_URL` | Base URL of the accounts authority (login, logout, authorize) | sandbox URL |
//! | `CUENTAS_CRUD_URL` | Base URL of the account-management API (introspection, users) | sandbox URL |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

/// Environment variable name for the accounts authority base URL.
pub const ACCOUNTS_API_URL_ENV: &str = "CUENTAS_API_URL";

/// Environment variable name for the account-management (CRUD) base URL.
pub const CRUD_API_URL_ENV: &str = "CUENTAS_CRUD_URL";

/// Environment variable selecting the log output format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Accounts authority used when `CUENTAS_API_URL` is not set.
pub const DEFAULT_ACCOUNTS_API_URL: &str = "https://cuentas-sandbox.gugle.com/api";

/// Account-management API used when `CUENTAS_CRUD_URL` is not set.
pub const DEFAULT_CRUD_API_URL: &str = "https://cuentas-sandbox.gugle.com/crud";

/// Timeout applied to every authority request.
///
/// The console never retries; a request that outlives this window is treated
/// as a failed attempt and surfaces through the fail-closed paths.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;
