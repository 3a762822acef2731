// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The maintenance gate.
//!
//! Every request is checked against the live maintenance flag and the
//! caller's identity. Nothing about the decision is cached: flipping the
//! flag takes effect on the very next request.
//!
//! ## Behavior
//!
//! | Mode | Viewer can bypass | Result |
//! |------|-------------------|--------|
//! | off  | any               | request served unchanged |
//! | on   | no                | `503` maintenance page (HTML) or JSON error under `/v1` |
//! | on   | yes               | request served, `X-Maintenance-Mode: active`, banner in HTML |
//!
//! Health probes and the countdown stream are always served.

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequestParts, Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE, RETRY_AFTER},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::banner::{BannerGuard, PageChrome};
use super::countdown::Countdown;
use super::page::{render_page, COUNTDOWN_STREAM_PATH};
use super::policy::Viewer;
use super::store::MaintenanceStore;
use crate::auth::OptionalAuth;
use crate::state::AppState;

/// Seconds clients are told to wait before retrying.
pub const RETRY_AFTER_SECS: u64 = 3600;

/// Set on responses served to a privileged viewer while maintenance is on.
pub const MAINTENANCE_HEADER: HeaderName = HeaderName::from_static("x-maintenance-mode");

/// Error code of the JSON body returned to API callers during maintenance.
pub const MAINTENANCE_ERROR_CODE: &str = "maintenance_mode";

/// Largest HTML body the gate will buffer to inject the banner.
const MAX_DECORATED_BODY: usize = 4 * 1024 * 1024;

const EXEMPT_PATHS: [&str; 4] = [
    "/health",
    "/health/live",
    "/health/ready",
    COUNTDOWN_STREAM_PATH,
];

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Normal,
    Maintenance,
}

/// `Maintenance` iff the mode is on and the viewer cannot bypass it.
pub fn decide(maintenance_mode: bool, can_bypass: bool) -> GateState {
    if maintenance_mode && !can_bypass {
        GateState::Maintenance
    } else {
        GateState::Normal
    }
}

/// What a [`GateView`] renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// The regular application. `banner` is set while a privileged viewer
    /// is looking at an instance in maintenance mode.
    App { banner: bool },
    /// The full maintenance page document.
    Maintenance(String),
}

/// A mounted gate for a single viewer.
///
/// Each [`render`](GateView::render) reads the store afresh. While the
/// viewer sees the app during maintenance the view holds a [`BannerGuard`]
/// on its chrome; the guard is released once the mode turns off or the
/// view is dropped.
pub struct GateView {
    store: MaintenanceStore,
    viewer: Viewer,
    chrome: PageChrome,
    banner: Option<BannerGuard>,
}

impl GateView {
    pub fn mount(store: MaintenanceStore, viewer: Viewer) -> Self {
        Self {
            store,
            viewer,
            chrome: PageChrome::new(),
            banner: None,
        }
    }

    /// Identity changed (sign-in, sign-out, role change).
    #[cfg(test)]
    fn set_viewer(&mut self, viewer: Viewer) {
        self.viewer = viewer;
    }

    pub fn chrome(&self) -> &PageChrome {
        &self.chrome
    }

    pub fn render(&mut self) -> Screen {
        let snapshot = self.store.get();
        let bypass = self.viewer.can_bypass();

        match decide(snapshot.is_maintenance_mode, bypass) {
            GateState::Maintenance => {
                self.banner = None;
                Screen::Maintenance(render_page(&snapshot.content, &Countdown::seed()))
            }
            GateState::Normal if snapshot.is_maintenance_mode => {
                if self.banner.is_none() {
                    self.banner = Some(BannerGuard::mount(&self.chrome));
                }
                Screen::App { banner: true }
            }
            GateState::Normal => {
                self.banner = None;
                Screen::App { banner: false }
            }
        }
    }
}

/// JSON body for API calls rejected during maintenance.
#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceErrorBody {
    pub error: String,
    pub error_code: String,
}

/// Axum middleware enforcing the gate around the whole router.
///
/// A caller identified here is stored in the request extensions so the
/// `Auth` extractors downstream do not decode the token twice.
pub async fn maintenance_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
        .await
        .unwrap_or_else(|never| match never {});

    let mut view = GateView::mount(state.maintenance.clone(), Viewer::from(user.as_ref()));

    match view.render() {
        Screen::Maintenance(html) => {
            tracing::debug!(path = %parts.uri.path(), "Request blocked by maintenance mode");
            maintenance_response(parts.uri.path(), html)
        }
        Screen::App { banner } => {
            if let Some(user) = user {
                parts.extensions.insert(user);
            }
            let response = next.run(Request::from_parts(parts, body)).await;
            if banner {
                decorate_preview(response, view.chrome()).await
            } else {
                response
            }
        }
    }
}

fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.contains(&path)
}

fn is_api_path(path: &str) -> bool {
    path == "/v1" || path.starts_with("/v1/")
}

fn maintenance_response(path: &str, html: String) -> Response {
    let retry_after = [(RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS))];

    if is_api_path(path) {
        let body = MaintenanceErrorBody {
            error: "Service is under maintenance".to_string(),
            error_code: MAINTENANCE_ERROR_CODE.to_string(),
        };
        (StatusCode::SERVICE_UNAVAILABLE, retry_after, Json(body)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, retry_after, Html(html)).into_response()
    }
}

fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"))
}

async fn decorate_preview(response: Response, chrome: &PageChrome) -> Response {
    let (mut parts, body) = response.into_parts();
    parts
        .headers
        .insert(MAINTENANCE_HEADER, HeaderValue::from_static("active"));

    if !is_html(&parts.headers) {
        return Response::from_parts(parts, body);
    }

    let bytes = match to_bytes(body, MAX_DECORATED_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to buffer HTML response for banner");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let decorated = match std::str::from_utf8(&bytes) {
        Ok(html) => chrome.decorate(html),
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };

    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(decorated))
}
