// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Who may see the portal while maintenance mode is on.

use crate::auth::AuthenticatedUser;

/// Roles allowed through the maintenance gate.
pub const BYPASS_ROLES: [&str; 2] = ["admin", "superadmin"];

/// True iff the viewer is authenticated and holds a bypass role.
///
/// Role names are matched exactly. Not cached: callers evaluate it on every
/// request because identity and mode change independently.
pub fn can_bypass(is_authenticated: bool, role: Option<&str>) -> bool {
    is_authenticated && role.is_some_and(|role| BYPASS_ROLES.contains(&role))
}

/// The identity facts the gate needs about a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub is_authenticated: bool,
    pub role: Option<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn can_bypass(&self) -> bool {
        can_bypass(self.is_authenticated, self.role.as_deref())
    }
}

impl From<Option<&AuthenticatedUser>> for Viewer {
    fn from(user: Option<&AuthenticatedUser>) -> Self {
        match user {
            Some(user) => Viewer {
                is_authenticated: true,
                role: Some(user.role.to_string()),
            },
            None => Viewer::anonymous(),
        }
    }
}
