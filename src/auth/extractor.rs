// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, decode_header, Validation};

use super::{AuthError, AuthenticatedUser, JwksManager, TokenClaims};
use crate::state::{AppState, AuthConfig};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Extractor for authenticated users.
///
/// ## Authentication Modes
///
/// - **Production mode** (CLERK_JWKS_URL set): Full JWT verification against Clerk JWKS
/// - **Development mode** (no CLERK_JWKS_URL): Structure validation only (no signature check)
///
/// A user already placed in the request extensions (by the maintenance gate)
/// is reused without decoding the token again.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = verify_jwt(token, &state.auth_config).await?;
        Ok(Auth(user))
    }
}

/// Verify a JWT and extract user information.
pub async fn verify_jwt(
    token: &str,
    auth_config: &AuthConfig,
) -> Result<AuthenticatedUser, AuthError> {
    match auth_config.jwks {
        Some(ref jwks) => verify_jwt_production(token, jwks, auth_config).await,
        None => verify_jwt_development(token),
    }
}

async fn verify_jwt_production(
    token: &str,
    jwks: &JwksManager,
    auth_config: &AuthConfig,
) -> Result<AuthenticatedUser, AuthError> {
    let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

    let (decoding_key, algorithm) = match header.kid {
        Some(ref kid) => jwks.get_decoding_key(kid).await?,
        None => jwks.get_any_decoding_key().await?,
    };

    let mut validation = Validation::new(algorithm);
    validation.leeway = CLOCK_SKEW_LEEWAY;

    if let Some(ref issuer) = auth_config.issuer {
        validation.set_issuer(&[issuer]);
    }

    match auth_config.audience {
        Some(ref audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<TokenClaims>(token, &decoding_key, &validation)
        .map_err(|e| AuthError::from_jwt(&e))?;

    Ok(AuthenticatedUser::from_claims(token_data.claims))
}

/// Development JWT verification (no signature check).
///
/// WARNING: only reachable when no JWKS URL is configured.
fn verify_jwt_development(token: &str) -> Result<AuthenticatedUser, AuthError> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token)
        .map_err(|_| AuthError::MalformedToken)?;
    let claims = token_data.claims;

    let now = chrono::Utc::now().timestamp();
    if claims.exp > 0 && claims.exp < now - CLOCK_SKEW_LEEWAY as i64 {
        return Err(AuthError::TokenExpired);
    }

    Ok(AuthenticatedUser::from_claims(claims))
}

/// Extractor that requires the admin or superadmin role.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            tracing::warn!(user_id = %user.user_id, role = %user.role, "Admin access denied");
            crate::audit_log!(
                &state.storage,
                crate::storage::AuditEventType::PermissionDenied,
                user,
                "admin",
                serde_json::json!({ "path": parts.uri.path() })
            );
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(user))
    }
}

/// Optional authentication extractor.
///
/// Yields `None` when no valid authentication is present instead of rejecting.
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(user)) => Ok(OptionalAuth(Some(user))),
            Err(AuthError::MissingAuthHeader) => Ok(OptionalAuth(None)),
            Err(e) => {
                tracing::debug!(error_code = e.error_code(), "Ignoring invalid credentials");
                Ok(OptionalAuth(None))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    /// Unsigned test JWT; only accepted in development mode.
    pub fn create_test_jwt(user_id: &str, role: Option<&str>, exp: i64) -> String {
        let header = r#"{"alg":"RS256","typ":"JWT"}"#;
        let mut claims = serde_json::json!({
            "sub": user_id,
            "iat": 1609459200,
            "exp": exp,
            "iss": "test",
            "sid": "sess_123",
        });
        if let Some(role) = role {
            claims["publicMetadata"] = serde_json::json!({ "role": role });
        }

        let header_b64 = URL_SAFE_NO_PAD.encode(header.as_bytes());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header_b64}.{claims_b64}.fake_signature")
    }

    pub fn bearer(user_id: &str, role: Option<&str>) -> String {
        format!("Bearer {}", create_test_jwt(user_id, role, 9999999999))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{bearer, create_test_jwt};
    use super::*;
    use crate::auth::Role;
    use axum::http::Request;

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = AppState::default();
        let mut parts = parts_with(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_non_bearer_scheme() {
        let state = AppState::default();
        let mut parts = parts_with(Some("Basic dXNlcjpwYXNz"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_jwt() {
        let state = AppState::default();
        let mut parts = parts_with(Some(&bearer("user_123", Some("admin"))));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.user_id, "user_123");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.session_id.as_deref(), Some("sess_123"));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let state = AppState::default();
        let token = create_test_jwt("user_123", None, 1609459200);
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let state = AppState::default();
        let mut parts = parts_with(Some("Bearer not.a.jwt"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let state = AppState::default();
        let mut parts = parts_with(None);
        parts
            .extensions
            .insert(AuthenticatedUser::for_tests("user_from_gate", Role::Admin));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.user_id, "user_from_gate");
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let state = AppState::default();
        let mut parts = parts_with(None);
        parts
            .extensions
            .insert(AuthenticatedUser::for_tests("user_123", Role::User));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn admin_only_accepts_superadmin() {
        let state = AppState::default();
        let mut parts = parts_with(Some(&bearer("owner", Some("superadmin"))));

        let AdminOnly(user) = AdminOnly::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.role, Role::Superadmin);
    }

    #[tokio::test]
    async fn optional_auth_returns_none_without_user() {
        let state = AppState::default();
        let mut parts = parts_with(None);

        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn optional_auth_treats_bad_token_as_anonymous() {
        let state = AppState::default();
        let mut parts = parts_with(Some("Bearer ???"));

        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
