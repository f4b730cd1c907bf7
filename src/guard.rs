// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The access guard: single authority on admit/redirect decisions.
//!
//! ## Navigation gating
//!
//! [`AccessGuard::evaluate_navigation`] is a synchronous state machine over
//! the session store and the route classifier; pure navigation never costs a
//! network round trip. The shell re-runs it on every route change and on
//! mount, because a guarded call may clear the token while a page is
//! showing.
//!
//! ## Privileged calls
//!
//! [`AccessGuard::guarded_call`] implements validate-then-execute: the token
//! is introspected remotely immediately before the action, an invalid token
//! evicts the session before the caller learns of the expiry, and the action
//! never runs against a token already known to be stale.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::authority::Authority;
use crate::error::ConsoleError;
use crate::models::User;
use crate::routes::{RouteClass, RouteClassifier, System, PROTECTED_HOME, PUBLIC_ENTRY};
use crate::session::{claims, Identity, Session, SessionStore};

/// Outcome of a navigation check, consumed by the UI shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationVerdict {
    pub admit: bool,
    /// Where the shell must navigate instead, when not admitted.
    pub redirect_to: Option<&'static str>,
    /// Original target, carried across the login redirect so the shell can
    /// resume it after authentication.
    pub resume_from: Option<String>,
}

impl NavigationVerdict {
    fn admit() -> Self {
        Self {
            admit: true,
            redirect_to: None,
            resume_from: None,
        }
    }

    fn redirect(target: &'static str) -> Self {
        Self {
            admit: false,
            redirect_to: Some(target),
            resume_from: None,
        }
    }

    fn redirect_with_resume(target: &'static str, from: &str) -> Self {
        Self {
            admit: false,
            redirect_to: Some(target),
            resume_from: Some(from.to_string()),
        }
    }
}

/// Distinguished outcome of a guarded privileged call.
#[derive(Debug, thiserror::Error)]
pub enum GuardedCallError<E> {
    /// The token was missing or rejected; the session store has already been
    /// cleared when this value is observed.
    #[error("session expired, sign in again")]
    SessionExpired,

    /// The wrapped action ran and failed on its own terms.
    #[error("{0}")]
    Action(E),
}

impl<E> GuardedCallError<E> {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, GuardedCallError::SessionExpired)
    }
}

/// Orchestrates the session store, the route classifier, and the remote
/// authority into admit/redirect decisions.
pub struct AccessGuard {
    session: SessionStore,
    classifier: RouteClassifier,
    authority: Arc<dyn Authority>,
}

impl AccessGuard {
    pub fn new(session: SessionStore, authority: Arc<dyn Authority>) -> Self {
        Self {
            session,
            classifier: RouteClassifier::new(),
            authority,
        }
    }

    /// The session store this guard decides over.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Synchronous navigation gate.
    ///
    /// | session | target    | verdict                           |
    /// |---------|-----------|-----------------------------------|
    /// | absent  | protected | redirect to login, carry target   |
    /// | absent  | public    | admit                             |
    /// | present | public    | redirect to the protected home    |
    /// | present | protected | admit                             |
    pub fn evaluate_navigation(&self, path: &str) -> NavigationVerdict {
        let verdict = match (self.session.is_authenticated(), self.classifier.classify(path)) {
            (false, RouteClass::Protected) => {
                NavigationVerdict::redirect_with_resume(PUBLIC_ENTRY, path)
            }
            (false, RouteClass::Public) => NavigationVerdict::admit(),
            (true, RouteClass::Public) => NavigationVerdict::redirect(PROTECTED_HOME),
            (true, RouteClass::Protected) => NavigationVerdict::admit(),
        };
        debug!(path, admit = verdict.admit, "navigation evaluated");
        verdict
    }

    /// Navigation gate plus the remote grant check for system-mapped paths.
    ///
    /// Admission requires an explicit positive verdict from the authority.
    /// Anything else (explicit denial, rejected token, unreachable
    /// authority) evicts the session and redirects to the public entry: a
    /// user who authenticates but lacks the grant must not retain a usable
    /// session.
    pub async fn authorize_navigation(&self, path: &str) -> NavigationVerdict {
        let verdict = self.evaluate_navigation(path);
        if !verdict.admit {
            return verdict;
        }
        let Some(system) = self.classifier.required_system(path) else {
            return verdict;
        };
        let Some(token) = self.session.token() else {
            return NavigationVerdict::redirect_with_resume(PUBLIC_ENTRY, path);
        };

        match self.authority.authorize(&token, system).await {
            Ok(true) => verdict,
            Ok(false) => {
                info!(%system, "grant denied, evicting session");
                self.session.clear();
                NavigationVerdict::redirect_with_resume(PUBLIC_ENTRY, path)
            }
            Err(err) => {
                info!(%system, error = %err, "authorization failed, evicting session");
                self.session.clear();
                NavigationVerdict::redirect_with_resume(PUBLIC_ENTRY, path)
            }
        }
    }

    /// Authenticate against the authority and install the session.
    ///
    /// Identity comes from the token payload when decodable, else from the
    /// login response. The console grant (system 1) is checked in the same
    /// flow; a login without it leaves no session behind.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ConsoleError> {
        let response = self.authority.login(username, password).await?;
        let token = response.token;
        let identity = claims::decode_identity(&token).unwrap_or(Identity {
            user_id: response.user_id,
            expires_at: Utc::now().timestamp() + response.expires_in,
        });
        self.session.set(token.clone(), Some(identity));

        match self.authority.authorize(&token, System::Cuentas).await {
            Ok(true) => {
                info!(user_id = identity.user_id, "login succeeded");
                Ok(Session {
                    token,
                    identity: Some(identity),
                })
            }
            Ok(false) => {
                info!(user_id = identity.user_id, "console grant missing, evicting session");
                self.session.clear();
                Err(ConsoleError::Unauthorized)
            }
            Err(err) => {
                self.session.clear();
                Err(err)
            }
        }
    }

    /// Invalidate the token remotely, then destroy the local session.
    ///
    /// The local clear happens unconditionally: an explicit logout always
    /// leaves the tab unauthenticated, even with the authority unreachable.
    pub async fn logout(&self) -> Result<(), ConsoleError> {
        let result = match self.session.token() {
            Some(token) => self.authority.logout(&token).await,
            None => Ok(()),
        };
        self.session.clear();
        if result.is_ok() {
            info!("logged out");
        }
        result
    }

    /// The signed-in user's account record.
    pub async fn current_user(&self) -> Result<User, ConsoleError> {
        let session = self.session.get().ok_or(ConsoleError::Unauthenticated)?;
        let identity = session.identity.ok_or(ConsoleError::InvalidOrExpiredToken)?;
        self.authority.fetch_user(&session.token, identity.user_id).await
    }

    /// Validate-then-execute around a privileged action.
    ///
    /// 1. No token: clear (idempotent) and report expiry without touching
    ///    the network.
    /// 2. Introspect the token; invalid evicts the session *before* the
    ///    caller sees [`GuardedCallError::SessionExpired`], so no further
    ///    action can be attempted with the dead token.
    /// 3. Valid: run the action and propagate its own result.
    pub async fn guarded_call<T, E, F, Fut>(&self, action: F) -> Result<T, GuardedCallError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(token) = self.session.token() else {
            self.session.clear();
            return Err(GuardedCallError::SessionExpired);
        };
        if !self.authority.is_token_valid(&token).await {
            self.session.clear();
            return Err(GuardedCallError::SessionExpired);
        }
        action().await.map_err(GuardedCallError::Action)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::models::LoginResponse;

    /// Scriptable authority double.
    struct StubAuthority {
        accept_login: bool,
        grant: bool,
        token_valid: bool,
        fail_logout: bool,
        validations: AtomicUsize,
        authorize_calls: AtomicUsize,
    }

    impl Default for StubAuthority {
        fn default() -> Self {
            Self {
                accept_login: true,
                grant: true,
                token_valid: true,
                fail_logout: false,
                validations: AtomicUsize::new(0),
                authorize_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Authority for StubAuthority {
        async fn login(
            &self,
            _username: &str,
            _password: &str,
        ) -> Result<LoginResponse, ConsoleError> {
            if self.accept_login {
                Ok(LoginResponse {
                    token: "opaque-token".to_string(),
                    expires_in: 3600,
                    user_id: 7,
                })
            } else {
                Err(ConsoleError::InvalidCredentials)
            }
        }

        async fn logout(&self, _token: &str) -> Result<(), ConsoleError> {
            if self.fail_logout {
                Err(ConsoleError::Network("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        async fn authorize(&self, _token: &str, _system: System) -> Result<bool, ConsoleError> {
            self.authorize_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.grant)
        }

        async fn is_token_valid(&self, _token: &str) -> bool {
            self.validations.fetch_add(1, Ordering::SeqCst);
            self.token_valid
        }

        async fn fetch_user(&self, _token: &str, user_id: i64) -> Result<User, ConsoleError> {
            Ok(User {
                id: user_id,
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                username: "ada@gugle.com".to_string(),
                grants: Vec::new(),
            })
        }
    }

    fn guard_with(authority: StubAuthority) -> (AccessGuard, Arc<StubAuthority>) {
        let authority = Arc::new(authority);
        let guard = AccessGuard::new(SessionStore::default(), authority.clone());
        (guard, authority)
    }

    fn signed_in(guard: &AccessGuard) {
        guard.session().set(
            "tok",
            Some(Identity {
                user_id: 7,
                expires_at: 9999999999,
            }),
        );
    }

    #[test]
    fn protected_paths_without_token_redirect_to_login() {
        let (guard, _) = guard_with(StubAuthority::default());
        for path in ["/", "/admin/users", "/yimeil/inbox", "/unmapped"] {
            let verdict = guard.evaluate_navigation(path);
            assert!(!verdict.admit, "{path} must not be admitted");
            assert_eq!(verdict.redirect_to, Some(PUBLIC_ENTRY));
            assert_eq!(verdict.resume_from.as_deref(), Some(path));
        }
    }

    #[test]
    fn public_paths_without_token_are_admitted() {
        let (guard, _) = guard_with(StubAuthority::default());
        assert!(guard.evaluate_navigation("/login").admit);
        assert!(guard.evaluate_navigation("/register").admit);
    }

    #[test]
    fn public_paths_with_token_redirect_home() {
        let (guard, _) = guard_with(StubAuthority::default());
        signed_in(&guard);
        for path in ["/login", "/register"] {
            let verdict = guard.evaluate_navigation(path);
            assert!(!verdict.admit);
            assert_eq!(verdict.redirect_to, Some(PROTECTED_HOME));
        }
    }

    #[test]
    fn protected_paths_with_token_are_admitted() {
        let (guard, _) = guard_with(StubAuthority::default());
        signed_in(&guard);
        assert!(guard.evaluate_navigation("/admin/users").admit);
    }

    #[test]
    fn verdicts_follow_an_asynchronous_session_clear() {
        let (guard, _) = guard_with(StubAuthority::default());
        signed_in(&guard);
        assert!(guard.evaluate_navigation("/admin/users").admit);

        // A failed validation elsewhere cleared the token while the page
        // stayed mounted; re-evaluation must now deny.
        guard.session().clear();
        let verdict = guard.evaluate_navigation("/admin/users");
        assert!(!verdict.admit);
        assert_eq!(verdict.redirect_to, Some(PUBLIC_ENTRY));
    }

    #[tokio::test]
    async fn authorize_navigation_skips_the_remote_for_unmapped_paths() {
        let (guard, authority) = guard_with(StubAuthority::default());
        signed_in(&guard);
        let verdict = guard.authorize_navigation("/admin/users").await;
        assert!(verdict.admit);
        assert_eq!(authority.authorize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authorize_navigation_admits_on_explicit_grant() {
        let (guard, authority) = guard_with(StubAuthority::default());
        signed_in(&guard);
        let verdict = guard.authorize_navigation("/yimeil/inbox").await;
        assert!(verdict.admit);
        assert_eq!(authority.authorize_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn authorize_navigation_denial_evicts_session_and_redirects() {
        let (guard, _) = guard_with(StubAuthority {
            grant: false,
            ..StubAuthority::default()
        });
        signed_in(&guard);

        let verdict = guard.authorize_navigation("/yimeil/inbox").await;
        assert!(!verdict.admit);
        assert_eq!(verdict.redirect_to, Some(PUBLIC_ENTRY));
        assert_eq!(guard.session().get(), None);
    }

    #[tokio::test]
    async fn guarded_call_runs_the_action_on_a_valid_token() {
        let (guard, authority) = guard_with(StubAuthority::default());
        signed_in(&guard);

        let result: Result<i32, GuardedCallError<ConsoleError>> =
            guard.guarded_call(|| async { Ok(41 + 1) }).await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(authority.validations.load(Ordering::SeqCst), 1);
        assert!(guard.session().is_authenticated());
    }

    #[tokio::test]
    async fn guarded_call_with_stale_token_never_runs_the_action() {
        let (guard, _) = guard_with(StubAuthority {
            token_valid: false,
            ..StubAuthority::default()
        });
        signed_in(&guard);

        let ran = AtomicUsize::new(0);
        let result: Result<(), GuardedCallError<ConsoleError>> = guard
            .guarded_call(|| async {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(result.unwrap_err().is_session_expired());
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        // The store is empty by the time the caller observes the expiry.
        assert_eq!(guard.session().get(), None);
    }

    #[tokio::test]
    async fn guarded_call_without_a_token_skips_introspection() {
        let (guard, authority) = guard_with(StubAuthority::default());

        let result: Result<(), GuardedCallError<ConsoleError>> =
            guard.guarded_call(|| async { Ok(()) }).await;
        assert!(result.unwrap_err().is_session_expired());
        assert_eq!(authority.validations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn guarded_call_propagates_the_actions_own_error() {
        let (guard, _) = guard_with(StubAuthority::default());
        signed_in(&guard);

        let result: Result<(), GuardedCallError<ConsoleError>> = guard
            .guarded_call(|| async { Err(ConsoleError::Conflict) })
            .await;
        match result.unwrap_err() {
            GuardedCallError::Action(ConsoleError::Conflict) => {}
            other => panic!("expected the conflict to pass through, got {other:?}"),
        }
        // The action failing is not a session failure.
        assert!(guard.session().is_authenticated());
    }

    #[tokio::test]
    async fn login_installs_a_session_with_fallback_identity() {
        let (guard, _) = guard_with(StubAuthority::default());

        let session = guard.login("ada@gugle.com", "Abcdef1!").await.unwrap();
        // "opaque-token" is not a JWT, so identity falls back to the
        // login response fields.
        let identity = session.identity.unwrap();
        assert_eq!(identity.user_id, 7);
        assert!(identity.expires_at > Utc::now().timestamp());
        assert!(guard.session().is_authenticated());
    }

    #[tokio::test]
    async fn login_with_bad_credentials_stores_nothing() {
        let (guard, _) = guard_with(StubAuthority {
            accept_login: false,
            ..StubAuthority::default()
        });

        let err = guard.login("ada@gugle.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidCredentials));
        assert_eq!(guard.session().get(), None);
    }

    #[tokio::test]
    async fn login_without_the_console_grant_evicts_the_session() {
        let (guard, _) = guard_with(StubAuthority {
            grant: false,
            ..StubAuthority::default()
        });

        let err = guard.login("ada@gugle.com", "Abcdef1!").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Unauthorized));
        assert_eq!(guard.session().get(), None);
    }

    #[tokio::test]
    async fn logout_clears_locally_even_when_the_authority_errors() {
        let (guard, _) = guard_with(StubAuthority {
            fail_logout: true,
            ..StubAuthority::default()
        });
        signed_in(&guard);

        let result = guard.logout().await;
        assert!(result.is_err());
        assert_eq!(guard.session().get(), None);
    }

    #[tokio::test]
    async fn current_user_resolves_through_the_decoded_identity() {
        let (guard, _) = guard_with(StubAuthority::default());
        signed_in(&guard);

        let user = guard.current_user().await.unwrap();
        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn current_user_without_a_session_is_unauthenticated() {
        let (guard, _) = guard_with(StubAuthority::default());
        let err = guard.current_user().await.unwrap_err();
        assert!(matches!(err, ConsoleError::Unauthenticated));
    }
}
