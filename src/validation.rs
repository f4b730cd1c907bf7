// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account form validation.
//!
//! Pure and deterministic: the same input always yields the same verdict,
//! and rules are evaluated in a fixed order so the first failing rule owns
//! the message. A failed validation blocks the network call entirely.
//!
//! Rule order: required fields, name charset, email format, password
//! strength, grant ids. The emptiness check runs before the email-format
//! check on purpose: an empty password next to a well-formed email must
//! report "fill in all fields", not a strength failure.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::routes::System;

/// First and last name of an account holder.
#[derive(Debug, Clone, Copy)]
pub struct FullName<'a> {
    pub first: &'a str,
    pub last: &'a str,
}

/// Input to [`validate_account_form`].
///
/// `new` requires a password (account creation); edits that may leave the
/// password untouched opt out with [`AccountForm::password_optional`].
#[derive(Debug, Clone, Copy)]
pub struct AccountForm<'a> {
    pub email: &'a str,
    pub password: Option<&'a str>,
    pub full_name: Option<FullName<'a>>,
    pub grant_ids: Option<&'a [i64]>,
    pub require_password: bool,
}

impl<'a> AccountForm<'a> {
    pub fn new(email: &'a str, password: Option<&'a str>) -> Self {
        Self {
            email,
            password,
            full_name: None,
            grant_ids: None,
            require_password: true,
        }
    }

    pub fn with_full_name(mut self, first: &'a str, last: &'a str) -> Self {
        self.full_name = Some(FullName { first, last });
        self
    }

    pub fn with_grant_ids(mut self, grant_ids: &'a [i64]) -> Self {
        self.grant_ids = Some(grant_ids);
        self
    }

    pub fn password_optional(mut self) -> Self {
        self.require_password = false;
        self
    }
}

/// First violated rule, with its user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all of the fields.")]
    MissingFields,

    #[error("Names may only contain letters and spaces.")]
    InvalidNameCharset,

    #[error("The email address must end with @gugle.com.")]
    InvalidEmail,

    #[error("The password must be at least 8 characters long and include an uppercase letter, a lowercase letter, a digit, and a special character.")]
    WeakPassword,

    #[error("System grants must be ids between 1 and 4.")]
    UnknownGrantId,
}

/// Validate an account creation/edit payload.
pub fn validate_account_form(form: &AccountForm<'_>) -> Result<(), FormError> {
    let password_missing = form.require_password && form.password.is_none_or(str::is_empty);
    let name_missing = form
        .full_name
        .is_some_and(|name| name.first.is_empty() || name.last.is_empty());
    if form.email.is_empty() || password_missing || name_missing {
        return Err(FormError::MissingFields);
    }

    if let Some(name) = form.full_name {
        let pattern = name_pattern();
        if !pattern.is_match(name.first) || !pattern.is_match(name.last) {
            return Err(FormError::InvalidNameCharset);
        }
    }

    if !email_pattern().is_match(form.email) {
        return Err(FormError::InvalidEmail);
    }

    if form.require_password {
        if let Some(password) = form.password {
            if !password_is_strong(password) {
                return Err(FormError::WeakPassword);
            }
        }
    }

    if let Some(grant_ids) = form.grant_ids {
        if grant_ids.iter().any(|id| System::from_id(*id).is_none()) {
            return Err(FormError::UnknownGrantId);
        }
    }

    Ok(())
}

/// Local part restricted to the usual address charset, domain fixed. The
/// anchors double as the no-surrounding-whitespace rule.
fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@gugle\.com$").expect("email pattern is valid")
    })
}

/// Letters (diacritics included) and spaces.
fn name_pattern() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[\p{L} ]+$").expect("name pattern is valid"))
}

/// At least 8 characters with one ASCII lowercase, one uppercase, one digit,
/// and one character outside the alphanumerics.
fn password_is_strong(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}
