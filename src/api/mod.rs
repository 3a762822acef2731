// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    error::ErrorBody,
    maintenance::{
        gate::MaintenanceErrorBody, maintenance_gate, page::COUNTDOWN_STREAM_PATH, Countdown,
        MaintenanceContent, MaintenanceContentPatch, MaintenanceState, SocialLinks,
        SocialLinksPatch,
    },
    state::AppState,
    storage::{AuditEvent, AuditEventType},
};

pub mod admin;
pub mod app;
pub mod health;
pub mod maintenance;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/maintenance/status", get(maintenance::get_status))
        .route("/users/me", get(users::get_current_user))
        .route("/admin/maintenance", get(maintenance::get_maintenance))
        .route("/admin/maintenance/mode", put(maintenance::set_mode))
        .route(
            "/admin/maintenance/content",
            patch(maintenance::update_content),
        )
        .route("/admin/maintenance/reset", post(maintenance::reset_content))
        .route("/admin/maintenance/preview", get(maintenance::preview))
        .route("/admin/audit/events", get(admin::query_audit_logs))
        .route("/admin/health", get(admin::get_detailed_health));

    Router::new()
        .route("/", get(app::app_shell))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route(COUNTDOWN_STREAM_PATH, get(maintenance::countdown_stream))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            maintenance_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        app::app_shell,
        health::health,
        health::liveness,
        health::readiness,
        users::get_current_user,
        maintenance::get_status,
        maintenance::countdown_stream,
        maintenance::get_maintenance,
        maintenance::set_mode,
        maintenance::update_content,
        maintenance::reset_content,
        maintenance::preview,
        admin::query_audit_logs,
        admin::get_detailed_health
    ),
    components(
        schemas(
            Role,
            ErrorBody,
            MaintenanceErrorBody,
            MaintenanceState,
            MaintenanceContent,
            MaintenanceContentPatch,
            SocialLinks,
            SocialLinksPatch,
            Countdown,
            AuditEvent,
            AuditEventType,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            users::UserMeResponse,
            maintenance::MaintenanceStatusResponse,
            maintenance::SetModeRequest,
            admin::AuditLogResponse,
            admin::DetailedHealthResponse,
            admin::StorageHealth
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Portal", description = "Portal app shell"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Users", description = "Current user identity"),
        (name = "Maintenance", description = "Maintenance mode and maintenance page content"),
        (name = "Admin", description = "Audit log and operational tooling")
    )
)]
struct ApiDoc;
