// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wire Data Models
//!
//! Request and response structures exchanged with the remote Cuentas
//! authority. Field names on the wire are camelCase (`expiresIn`, `userId`,
//! `systemId`); the structs stay snake_case through serde renames.

use serde::{Deserialize, Serialize};

/// Permission associating a user with one of the downstream systems.
///
/// Grants are created and removed only through the account-management
/// mutation path; the console never infers them client-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemGrant {
    /// One of the four known system ids.
    pub system_id: i64,
    /// Display name of the granted system.
    pub name: String,
}

/// A managed user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Email address, doubling as the login name.
    pub username: String,
    /// Zero or more grants; system id unique per user, order irrelevant.
    #[serde(default)]
    pub grants: Vec<SystemGrant>,
}

/// Credentials posted to `login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful `login` response (HTTP 201).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Opaque credential carried on every privileged request.
    pub token: String,
    /// Seconds until the token expires; a hint only, the token payload wins.
    pub expires_in: i64,
    pub user_id: i64,
}

/// Body posted to `authorize`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest<'a> {
    pub token: &'a str,
    pub system_id: i64,
}

/// Verdict returned by `authorize`. Transient, never persisted.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AuthorizeResponse {
    pub authorized: bool,
}

/// Payload for creating or replacing a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Ids of the systems the account is granted access to.
    #[serde(default)]
    pub grant_ids: Vec<i64>,
}
