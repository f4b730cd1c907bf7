// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote Cuentas authority client.
//!
//! The authority exposes two base URLs: the accounts endpoints (login,
//! logout, authorize, user lookup) and the account-management CRUD endpoints
//! (token introspection plus the `/users` surface). Both carry the session
//! token bearer-style on privileged requests.
//!
//! The gating core depends on the narrow [`Authority`] trait; the HTTP
//! implementation lives in [`AuthorityClient`]. The trait keeps the access
//! guard testable without a network and leaves room for an embedder to
//! interpose caching or recording.
//!
//! ## Failure policy
//!
//! No retries anywhere. Token introspection is fail-closed: any non-success
//! status or transport failure reads as "invalid", because the caller cannot
//! distinguish "expired" from "unreachable" and must not proceed on either.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use crate::config::{
    ACCOUNTS_API_URL_ENV, CRUD_API_URL_ENV, DEFAULT_ACCOUNTS_API_URL, DEFAULT_CRUD_API_URL,
    REQUEST_TIMEOUT_SECS,
};
use crate::error::ConsoleError;
use crate::models::{
    AuthorizeRequest, AuthorizeResponse, LoginRequest, LoginResponse, UpsertUserRequest, User,
};
use crate::routes::System;

/// Operations the gating core needs from the remote authority.
#[async_trait]
pub trait Authority: Send + Sync {
    /// Exchange credentials for a session token.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ConsoleError>;

    /// Invalidate the token on the authority side.
    async fn logout(&self, token: &str) -> Result<(), ConsoleError>;

    /// Ask whether `token` carries the grant for `system`.
    ///
    /// `Ok(true)` only on an explicit positive verdict.
    async fn authorize(&self, token: &str, system: System) -> Result<bool, ConsoleError>;

    /// Fail-closed token introspection; never errors.
    async fn is_token_valid(&self, token: &str) -> bool;

    /// Fetch a single user account.
    async fn fetch_user(&self, token: &str, user_id: i64) -> Result<User, ConsoleError>;
}

/// HTTP client for the Cuentas authority.
#[derive(Debug, Clone)]
pub struct AuthorityClient {
    accounts_base_url: String,
    crud_base_url: String,
    http: Client,
}

impl AuthorityClient {
    /// Build the client from `CUENTAS_API_URL` / `CUENTAS_CRUD_URL`, falling
    /// back to the sandbox endpoints.
    pub fn from_env() -> Result<Self, ConsoleError> {
        let accounts = env_or_default(ACCOUNTS_API_URL_ENV, DEFAULT_ACCOUNTS_API_URL);
        let crud = env_or_default(CRUD_API_URL_ENV, DEFAULT_CRUD_API_URL);
        Self::new(accounts, crud)
    }

    pub fn new(
        accounts_base_url: impl Into<String>,
        crud_base_url: impl Into<String>,
    ) -> Result<Self, ConsoleError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ConsoleError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            accounts_base_url: trim_base_url(accounts_base_url.into()),
            crud_base_url: trim_base_url(crud_base_url.into()),
            http,
        })
    }

    fn accounts_url(&self, path: &str) -> String {
        format!("{}/{}", self.accounts_base_url, path)
    }

    fn crud_url(&self, path: &str) -> String {
        format!("{}/{}", self.crud_base_url, path)
    }

    // -------------------------------------------------------------------------
    // Account-management CRUD surface
    // -------------------------------------------------------------------------
    //
    // These are the privileged actions the UI grid performs. Callers are
    // expected to go through `AccessGuard::guarded_call`, which validates the
    // token immediately before the action runs.

    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, ConsoleError> {
        let response = self
            .http
            .get(self.crud_url("users"))
            .bearer_auth(token)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            status => Err(map_privileged_status(status)),
        }
    }

    pub async fn create_user(
        &self,
        token: &str,
        request: &UpsertUserRequest,
    ) -> Result<User, ConsoleError> {
        let response = self
            .http
            .post(self.crud_url("users"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            status => Err(map_privileged_status(status)),
        }
    }

    pub async fn update_user(
        &self,
        token: &str,
        user_id: i64,
        request: &UpsertUserRequest,
    ) -> Result<(), ConsoleError> {
        let response = self
            .http
            .put(self.crud_url(&format!("users/{user_id}")))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            status => Err(map_privileged_status(status)),
        }
    }

    pub async fn delete_user(&self, token: &str, user_id: i64) -> Result<(), ConsoleError> {
        let response = self
            .http
            .delete(self.crud_url(&format!("users/{user_id}")))
            .bearer_auth(token)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            status => Err(map_privileged_status(status)),
        }
    }
}

#[async_trait]
impl Authority for AuthorityClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ConsoleError> {
        let response = self
            .http
            .post(self.accounts_url("login"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::CREATED {
            // The authority answers 201 Created with the token envelope.
            Ok(response.json::<LoginResponse>().await?)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(ConsoleError::InvalidCredentials)
        } else {
            Err(ConsoleError::Remote(status.as_u16()))
        }
    }

    async fn logout(&self, token: &str) -> Result<(), ConsoleError> {
        let response = self
            .http
            .post(self.accounts_url("logout"))
            .bearer_auth(token)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            status => Err(ConsoleError::Remote(status.as_u16())),
        }
    }

    async fn authorize(&self, token: &str, system: System) -> Result<bool, ConsoleError> {
        let response = self
            .http
            .post(self.accounts_url("authorize"))
            .json(&AuthorizeRequest {
                token,
                system_id: system.id(),
            })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<AuthorizeResponse>().await?.authorized)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(ConsoleError::InvalidOrExpiredToken)
        } else {
            Err(ConsoleError::Remote(status.as_u16()))
        }
    }

    async fn is_token_valid(&self, token: &str) -> bool {
        let result = self
            .http
            .get(self.crud_url("isTokenValid"))
            .bearer_auth(token)
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                if response.status() == StatusCode::UNAUTHORIZED {
                    info!("token rejected by the authority");
                } else {
                    warn!(
                        status = %response.status(),
                        "unexpected introspection status, treating token as invalid"
                    );
                }
                false
            }
            Err(err) => {
                warn!(error = %err, "introspection unreachable, treating token as invalid");
                false
            }
        }
    }

    async fn fetch_user(&self, token: &str, user_id: i64) -> Result<User, ConsoleError> {
        let response = self
            .http
            .get(self.accounts_url(&format!("users/{user_id}")))
            .bearer_auth(token)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            status => Err(map_privileged_status(status)),
        }
    }
}

/// Map a non-success status from a privileged endpoint onto the taxonomy.
fn map_privileged_status(status: StatusCode) -> ConsoleError {
    if status == StatusCode::UNAUTHORIZED {
        ConsoleError::InvalidOrExpiredToken
    } else if status == StatusCode::FORBIDDEN {
        ConsoleError::Unauthorized
    } else if status == StatusCode::CONFLICT {
        ConsoleError::Conflict
    } else {
        ConsoleError::Remote(status.as_u16())
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
