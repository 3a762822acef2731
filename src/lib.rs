// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Portal - token platform portal server
//!
//! Serves the portal app shell and the `/v1` JSON API behind a
//! maintenance-mode gate. Admins and superadmins keep access during
//! maintenance and edit the page everyone else sees.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Authentication and authorization (Clerk JWT)
//! - `maintenance` - Maintenance mode store, gate and page
//! - `storage` - JSON file storage and audit log

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod state;
pub mod storage;
