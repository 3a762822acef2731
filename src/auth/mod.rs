// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Clerk JWT authentication for the portal.
//!
//! ## Auth Flow
//!
//! 1. The browser authenticates with Clerk
//! 2. Requests carry `Authorization: Bearer <Clerk JWT>`
//! 3. The server:
//!    - Fetches Clerk JWKS via HTTPS (cached with TTL)
//!    - Verifies signature, expiry, issuer, audience
//!    - Extracts `sub` as the user ID and `publicMetadata.role` as the role
//!
//! Without `CLERK_JWKS_URL` the server runs in development mode and only
//! checks token structure and expiry. Clock skew tolerance is 60 seconds.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod roles;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::{verify_jwt, AdminOnly, Auth, OptionalAuth};
pub use jwks::JwksManager;
pub use roles::Role;
