// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maintenance mode endpoints.
//!
//! The status endpoint and the countdown stream are public. Everything under
//! `/v1/admin/maintenance` requires the admin or superadmin role and every
//! mutation is written to the audit log.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html,
    },
    Json,
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    audit_log,
    auth::AdminOnly,
    maintenance::{
        render_page, Countdown, CountdownTicker, MaintenanceContentPatch, MaintenanceState,
    },
    state::AppState,
    storage::AuditEventType,
};

const AUDIT_RESOURCE: &str = "maintenance";

/// Public maintenance status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceStatusResponse {
    pub is_maintenance_mode: bool,
}

/// Request body for toggling maintenance mode.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetModeRequest {
    pub enabled: bool,
}

/// Whether the portal is in maintenance mode.
#[utoipa::path(
    get,
    path = "/v1/maintenance/status",
    tag = "Maintenance",
    responses(
        (status = 200, description = "Current maintenance flag", body = MaintenanceStatusResponse),
        (status = 503, description = "Maintenance mode is on and the caller cannot bypass it")
    )
)]
pub async fn get_status(State(state): State<AppState>) -> Json<MaintenanceStatusResponse> {
    Json(MaintenanceStatusResponse {
        is_maintenance_mode: state.maintenance.is_enabled(),
    })
}

/// Full maintenance state: flag and page content.
#[utoipa::path(
    get,
    path = "/v1/admin/maintenance",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Maintenance state", body = MaintenanceState),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn get_maintenance(
    AdminOnly(_user): AdminOnly,
    State(state): State<AppState>,
) -> Json<MaintenanceState> {
    Json(state.maintenance.get())
}

/// Turn maintenance mode on or off.
///
/// Idempotent; the record is persisted even when the flag does not change.
#[utoipa::path(
    put,
    path = "/v1/admin/maintenance/mode",
    tag = "Maintenance",
    request_body = SetModeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated maintenance state", body = MaintenanceState),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn set_mode(
    AdminOnly(user): AdminOnly,
    State(state): State<AppState>,
    Json(request): Json<SetModeRequest>,
) -> Json<MaintenanceState> {
    let previous = state.maintenance.is_enabled();
    state.maintenance.set_mode(request.enabled);

    audit_log!(
        &state.storage,
        AuditEventType::MaintenanceModeChanged,
        user,
        AUDIT_RESOURCE,
        serde_json::json!({ "enabled": request.enabled, "previous": previous })
    );

    Json(state.maintenance.get())
}

/// Merge a partial update into the maintenance page content.
///
/// Absent fields keep their value; `socialLinks` is merged key by key.
#[utoipa::path(
    patch,
    path = "/v1/admin/maintenance/content",
    tag = "Maintenance",
    request_body = MaintenanceContentPatch,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated maintenance state", body = MaintenanceState),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 422, description = "Malformed body")
    )
)]
pub async fn update_content(
    AdminOnly(user): AdminOnly,
    State(state): State<AppState>,
    Json(patch): Json<MaintenanceContentPatch>,
) -> Json<MaintenanceState> {
    let details = serde_json::to_value(&patch).unwrap_or_default();
    state.maintenance.update_content(patch);

    audit_log!(
        &state.storage,
        AuditEventType::MaintenanceContentUpdated,
        user,
        AUDIT_RESOURCE,
        details
    );

    Json(state.maintenance.get())
}

/// Restore the default page content. The mode flag is unchanged.
#[utoipa::path(
    post,
    path = "/v1/admin/maintenance/reset",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated maintenance state", body = MaintenanceState),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn reset_content(
    AdminOnly(user): AdminOnly,
    State(state): State<AppState>,
) -> Json<MaintenanceState> {
    state.maintenance.reset_to_defaults();
    audit_log!(&state.storage, AuditEventType::MaintenanceContentReset, user);
    Json(state.maintenance.get())
}

/// The maintenance page as visitors see it, rendered from the current content.
#[utoipa::path(
    get,
    path = "/v1/admin/maintenance/preview",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Maintenance page HTML", body = String, content_type = "text/html"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn preview(AdminOnly(_user): AdminOnly, State(state): State<AppState>) -> Html<String> {
    let snapshot = state.maintenance.get();
    Html(render_page(&snapshot.content, &Countdown::seed()))
}

/// Live countdown for the maintenance page (Server-Sent Events).
///
/// Each connection gets its own countdown starting from the seed value.
/// The ticker lives inside the stream, so it stops when the client leaves.
#[utoipa::path(
    get,
    path = "/maintenance/countdown",
    tag = "Maintenance",
    responses(
        (status = 200, description = "`countdown` events carrying a Countdown", body = Countdown, content_type = "text/event-stream")
    )
)]
pub async fn countdown_stream() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(countdown_events(CountdownTicker::start(Countdown::seed())))
        .keep_alive(KeepAlive::default())
}

fn countdown_events(ticker: CountdownTicker) -> impl Stream<Item = Result<Event, Infallible>> {
    let rx = ticker.watch();

    stream::unfold((ticker, rx, true), |(ticker, mut rx, first)| async move {
        if !first {
            rx.changed().await.ok()?;
        }
        let countdown = *rx.borrow_and_update();
        let event = Event::default()
            .event("countdown")
            .json_data(countdown)
            .ok()?;
        Some((Ok(event), (ticker, rx, false)))
    })
}
