// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use relational_portal_server::{
    api::router,
    config::{LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    maintenance::{FileStateBackend, MaintenanceStore},
    state::{AppState, AuthConfig},
    storage::{FileStorage, StoragePaths},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env();
    init_tracing(config.log_format);

    let mut storage = FileStorage::new(StoragePaths::new(&config.data_dir));
    if let Err(e) = storage.initialize() {
        tracing::warn!(
            error = %e,
            data_dir = %config.data_dir.display(),
            "Data directory unavailable, maintenance state will not persist"
        );
    }
    let storage = Arc::new(storage);

    let maintenance = if storage.is_initialized() {
        MaintenanceStore::load(FileStateBackend::new(storage.clone()))
    } else {
        MaintenanceStore::in_memory()
    };

    if let Some(enabled) = config.maintenance_override {
        tracing::info!(enabled, "Applying MAINTENANCE_MODE override");
        maintenance.set_mode(enabled);
    }

    let auth_config = AuthConfig::from_clerk(&config.clerk);
    if auth_config.is_production() {
        tracing::info!("JWT verification against Clerk JWKS enabled");
    } else {
        tracing::warn!("CLERK_JWKS_URL not set, JWT signatures are NOT verified (development mode)");
    }

    let state = AppState::new(storage, maintenance).with_auth_config(auth_config);
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Relational Portal listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server");
}
