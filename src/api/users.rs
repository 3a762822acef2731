// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{Auth, AuthenticatedUser, Role};
use crate::maintenance::Viewer;

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// User's unique ID (from Clerk)
    pub user_id: String,
    /// User's role
    pub role: Role,
    /// Session ID (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Whether this user keeps access to the portal during maintenance
    pub can_bypass_maintenance: bool,
}

impl From<AuthenticatedUser> for UserMeResponse {
    fn from(user: AuthenticatedUser) -> Self {
        let can_bypass_maintenance = Viewer::from(Some(&user)).can_bypass();
        Self {
            user_id: user.user_id,
            role: user.role,
            session_id: user.session_id,
            can_bypass_maintenance,
        }
    }
}

/// Get the current authenticated user's information.
///
/// Returns the identity and role of the caller, and whether the caller can
/// use the portal while maintenance mode is on.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<UserMeResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_me_response_from_authenticated_user() {
        let mut user = AuthenticatedUser::for_tests("user_123", Role::User);
        user.session_id = Some("sess_abc".to_string());

        let response: UserMeResponse = user.into();
        assert_eq!(response.user_id, "user_123");
        assert_eq!(response.role, Role::User);
        assert_eq!(response.session_id, Some("sess_abc".to_string()));
        assert!(!response.can_bypass_maintenance);
    }

    #[tokio::test]
    async fn admins_can_bypass_maintenance() {
        for role in [Role::Admin, Role::Superadmin] {
            let Json(me) =
                get_current_user(Auth(AuthenticatedUser::for_tests("staff", role))).await;
            assert!(me.can_bypass_maintenance);
        }
    }
}
