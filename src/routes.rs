// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route classification and the known downstream systems.
//!
//! ## Route Classes
//!
//! - `Public` - reachable without a session (`/login`, `/register`)
//! - `Protected` - everything else, including paths nobody declared
//!
//! Unmapped paths default to protected; classification never admits a path
//! it does not positively know to be public.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Public entry point unauthenticated callers are redirected to.
pub const PUBLIC_ENTRY: &str = "/login";

/// Landing page authenticated callers are redirected to from public pages.
pub const PROTECTED_HOME: &str = "/";

/// Paths reachable without a session. Exact match on the full path.
const PUBLIC_ROUTES: &[&str] = &["/login", "/register"];

/// Class of a navigational target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Protected,
}

/// The four downstream systems the console manages grants for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum System {
    /// The accounts system itself; the console is its UI.
    Cuentas,
    /// Mail.
    Yimeil,
    /// File storage.
    Draiv,
    /// Calendar.
    Kalendar,
}

impl System {
    pub const ALL: [System; 4] = [
        System::Cuentas,
        System::Yimeil,
        System::Draiv,
        System::Kalendar,
    ];

    /// Numeric id used on the wire.
    pub fn id(self) -> i64 {
        match self {
            System::Cuentas => 1,
            System::Yimeil => 2,
            System::Draiv => 3,
            System::Kalendar => 4,
        }
    }

    /// Parse a wire id back into the closed set.
    pub fn from_id(id: i64) -> Option<System> {
        match id {
            1 => Some(System::Cuentas),
            2 => Some(System::Yimeil),
            3 => Some(System::Draiv),
            4 => Some(System::Kalendar),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            System::Cuentas => "Cuentas",
            System::Yimeil => "Yimeil",
            System::Draiv => "Draiv",
            System::Kalendar => "K-lendar",
        }
    }

    /// First path segment of the console routes fronting this system.
    pub fn route_prefix(self) -> &'static str {
        match self {
            System::Cuentas => "/cuentas",
            System::Yimeil => "/yimeil",
            System::Draiv => "/draiv",
            System::Kalendar => "/k-lendar",
        }
    }
}

impl std::fmt::Display for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Pure, synchronous classifier over the static route table.
pub struct RouteClassifier {
    systems: HashMap<&'static str, System>,
}

impl RouteClassifier {
    pub fn new() -> Self {
        let systems = System::ALL
            .iter()
            .map(|system| (system.route_prefix(), *system))
            .collect();
        Self { systems }
    }

    /// Classify a navigational target. Unmapped paths are protected.
    pub fn classify(&self, path: &str) -> RouteClass {
        if PUBLIC_ROUTES.contains(&path) {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }

    /// System grant required by a path, when it fronts a downstream system.
    ///
    /// Matches on the first path segment, so `/yimeil/inbox/3` requires the
    /// Yimeil grant. Plain protected paths require authentication only.
    pub fn required_system(&self, path: &str) -> Option<System> {
        self.systems.get(first_segment(path)).copied()
    }
}

impl Default for RouteClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// First path segment in `/segment` form (`"/yimeil/inbox"` -> `"/yimeil"`).
fn first_segment(path: &str) -> &str {
    match path.strip_prefix('/') {
        Some(rest) => match rest.find('/') {
            Some(idx) => &path[..idx + 1],
            None => path,
        },
        None => path,
    }
}
