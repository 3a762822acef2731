// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims read from a Clerk session token.
///
/// See: https://clerk.com/docs/backend-requests/handling/manual-jwt
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration timestamp
    #[serde(default)]
    pub exp: i64,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Session ID (Clerk-specific)
    #[serde(default)]
    pub sid: Option<String>,
    /// Clerk public metadata containing role
    #[serde(default, rename = "publicMetadata")]
    pub public_metadata: Option<PublicMetadata>,
}

/// Clerk public metadata structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PublicMetadata {
    /// User's role (set in Clerk dashboard)
    #[serde(default)]
    pub role: Option<String>,
}

/// Authenticated user information extracted from JWT.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user ID (Clerk `sub` claim)
    pub user_id: String,

    /// User's role
    pub role: Role,

    /// Session ID (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Original issuer (not serialized)
    #[serde(skip)]
    pub issuer: String,

    /// Token expiration (Unix timestamp, not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Build from verified token claims. Unknown or missing roles become `User`.
    pub fn from_claims(claims: TokenClaims) -> Self {
        let role = claims
            .public_metadata
            .as_ref()
            .and_then(|m| m.role.as_deref())
            .and_then(Role::from_str)
            .unwrap_or_default();

        Self {
            user_id: claims.sub,
            role,
            session_id: claims.sid,
            issuer: claims.iss,
            expires_at: claims.exp,
        }
    }

    /// Admin or superadmin.
    pub fn is_admin(&self) -> bool {
        self.role.is_privileged()
    }

    #[cfg(test)]
    pub(crate) fn for_tests(user_id: &str, role: Role) -> Self {
        Self {
            user_id: user_id.to_string(),
            role,
            session_id: None,
            issuer: "test".to_string(),
            expires_at: 0,
        }
    }
}
