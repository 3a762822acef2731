// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::JwksManager;
use crate::config::ClerkConfig;
use crate::maintenance::MaintenanceStore;
use crate::storage::{FileStorage, StoragePaths};

/// Token verification settings shared by the auth extractors.
///
/// With `jwks` unset, tokens are decoded without signature verification
/// (development mode).
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub jwks: Option<JwksManager>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl AuthConfig {
    pub fn from_clerk(clerk: &ClerkConfig) -> Self {
        Self {
            jwks: clerk.jwks_url.as_deref().map(JwksManager::new),
            issuer: clerk.issuer.clone(),
            audience: clerk.audience.clone(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.jwks.is_some()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub maintenance: MaintenanceStore,
    pub storage: Arc<FileStorage>,
    pub auth_config: AuthConfig,
}

impl AppState {
    pub fn new(storage: Arc<FileStorage>, maintenance: MaintenanceStore) -> Self {
        Self {
            maintenance,
            storage,
            auth_config: AuthConfig::default(),
        }
    }

    pub fn with_auth_config(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = auth_config;
        self
    }
}

impl Default for AppState {
    /// In-memory maintenance store over an uninitialized data directory.
    fn default() -> Self {
        Self::new(
            Arc::new(FileStorage::new(StoragePaths::default())),
            MaintenanceStore::in_memory(),
        )
    }
}
