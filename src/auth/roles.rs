// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Superadmin` - Everything an admin can do
/// - `Admin` - Edits the maintenance page and toggles maintenance mode
/// - `User` - Normal portal user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform owner
    Superadmin,
    /// Portal administrator
    Admin,
    /// Regular user
    User,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Admin or superadmin.
    pub fn is_privileged(&self) -> bool {
        self.has_privilege(Role::Admin)
    }

    fn rank(&self) -> u8 {
        match self {
            Role::Superadmin => 2,
            Role::Admin => 1,
            Role::User => 0,
        }
    }

    /// Parse role from string (case-insensitive).
    /// Used when extracting roles from Clerk public metadata.
    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "superadmin" => Some(Role::Superadmin),
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl Default for Role {
    /// Default role is User (least privilege for authenticated users).
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superadmin_has_all_privileges() {
        assert!(Role::Superadmin.has_privilege(Role::Superadmin));
        assert!(Role::Superadmin.has_privilege(Role::Admin));
        assert!(Role::Superadmin.has_privilege(Role::User));
    }

    #[test]
    fn admin_is_below_superadmin() {
        assert!(!Role::Admin.has_privilege(Role::Superadmin));
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::User));
    }

    #[test]
    fn only_admins_are_privileged() {
        assert!(Role::Superadmin.is_privileged());
        assert!(Role::Admin.is_privileged());
        assert!(!Role::User.is_privileged());
    }

    #[test]
    fn from_str_parses_correctly() {
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("SuperAdmin"), Some(Role::Superadmin));
        assert_eq!(Role::from_str("user"), Some(Role::User));
        assert_eq!(Role::from_str("unknown"), None);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(Role::Superadmin.to_string(), "superadmin");
        assert_eq!(
            serde_json::to_string(&Role::Admin).unwrap(),
            format!("\"{}\"", Role::Admin)
        );
    }

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }
}
