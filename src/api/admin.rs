// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only API endpoints for operational tooling.
//!
//! These endpoints require the admin or superadmin role and provide:
//! - Audit log queries
//! - Detailed health information

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    audit_log,
    auth::AdminOnly,
    error::ApiError,
    state::AppState,
    storage::{AuditEvent, AuditEventType, AuditRepository},
};

/// Default and maximum page sizes for audit queries.
const DEFAULT_AUDIT_LIMIT: usize = 100;
const MAX_AUDIT_LIMIT: usize = 1000;

/// Widest date range (inclusive, in days) a single audit query may scan.
pub const MAX_AUDIT_RANGE_DAYS: i64 = 90;

/// Query parameters for audit log queries.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AuditQueryParams {
    /// Start date (YYYY-MM-DD format). Defaults to today.
    pub start_date: Option<String>,
    /// End date (YYYY-MM-DD format). Defaults to today.
    pub end_date: Option<String>,
    /// Filter by user ID.
    pub user_id: Option<String>,
    /// Filter by event type (snake_case, e.g. `maintenance_mode_changed`).
    pub event_type: Option<String>,
    /// Maximum number of results (default 100, max 1000).
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
}

/// Response for audit log queries.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogResponse {
    /// Audit events matching the query.
    pub events: Vec<AuditEvent>,
    /// Total count (before limit/offset).
    pub total: usize,
    /// Whether there are more results.
    pub has_more: bool,
}

/// Detailed health check response for admins.
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailedHealthResponse {
    pub status: String,
    pub storage: StorageHealth,
    /// Whether JWT signatures are verified against Clerk JWKS.
    pub auth_configured: bool,
    /// Current maintenance flag.
    pub maintenance_mode: bool,
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StorageHealth {
    pub data_dir: String,
    pub initialized: bool,
    pub writable: bool,
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, ApiError> {
    match value {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ApiError::bad_request(format!("Invalid {field} format. Use YYYY-MM-DD."))),
    }
}

/// Query audit logs.
///
/// Filters by date range, user ID and event type.
#[utoipa::path(
    get,
    path = "/v1/admin/audit/events",
    tag = "Admin",
    params(AuditQueryParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Audit events", body = AuditLogResponse),
        (status = 400, description = "Invalid query or date range wider than 90 days"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn query_audit_logs(
    AdminOnly(admin_user): AdminOnly,
    Query(params): Query<AuditQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<AuditLogResponse>, ApiError> {
    let start = parse_date(params.start_date.as_deref(), "start_date")?;
    let end = parse_date(params.end_date.as_deref(), "end_date")?;
    if start > end {
        return Err(ApiError::bad_request("start_date must not be after end_date"));
    }
    if (end - start).num_days() >= MAX_AUDIT_RANGE_DAYS {
        return Err(ApiError::bad_request(format!(
            "Date range too wide. Query at most {MAX_AUDIT_RANGE_DAYS} days at a time."
        )));
    }

    let mut events = AuditRepository::new(&state.storage).read_events_range(start, end)?;

    if let Some(user_id) = &params.user_id {
        events.retain(|e| e.user_id.as_deref() == Some(user_id.as_str()));
    }

    if let Some(event_type) = &params.event_type {
        events.retain(|e| {
            serde_json::to_value(&e.event_type)
                .ok()
                .is_some_and(|v| v.as_str() == Some(event_type.as_str()))
        });
    }

    let total = events.len();
    let limit = params
        .limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .min(MAX_AUDIT_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let has_more = offset.saturating_add(limit) < total;
    let events: Vec<AuditEvent> = events.into_iter().skip(offset).take(limit).collect();

    audit_log!(&state.storage, AuditEventType::AdminAccess, admin_user);

    Ok(Json(AuditLogResponse {
        events,
        total,
        has_more,
    }))
}

/// Get detailed health information.
///
/// More detailed than the public health endpoint. Admin only.
#[utoipa::path(
    get,
    path = "/v1/admin/health",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Detailed health status", body = DetailedHealthResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn get_detailed_health(
    AdminOnly(_user): AdminOnly,
    State(state): State<AppState>,
) -> Json<DetailedHealthResponse> {
    let writable = state.storage.health_check().is_ok();
    let initialized = state.storage.is_initialized();

    Json(DetailedHealthResponse {
        status: if writable { "healthy" } else { "degraded" }.to_string(),
        storage: StorageHealth {
            data_dir: state.storage.paths().root().to_string_lossy().to_string(),
            initialized,
            writable,
        },
        auth_configured: state.auth_config.is_production(),
        maintenance_mode: state.maintenance.is_enabled(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, Role};
    use crate::maintenance::MaintenanceStore;
    use crate::storage::{FileStorage, StoragePaths};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state() -> (TempDir, AppState) {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        let state = AppState::new(Arc::new(storage), MaintenanceStore::in_memory());
        (temp, state)
    }

    fn admin() -> AdminOnly {
        AdminOnly(AuthenticatedUser::for_tests("admin_1", Role::Admin))
    }

    fn log(state: &AppState, event_type: AuditEventType, user: &str) {
        AuditRepository::new(&state.storage)
            .log(&AuditEvent::new(event_type).with_user(user))
            .unwrap();
    }

    #[test]
    fn audit_query_params_deserializes() {
        let params: AuditQueryParams = serde_json::from_str(
            r#"{"start_date":"2026-01-01","end_date":"2026-01-31","limit":50}"#,
        )
        .unwrap();
        assert_eq!(params.start_date.as_deref(), Some("2026-01-01"));
        assert_eq!(params.limit, Some(50));
        assert!(params.user_id.is_none());
    }

    #[tokio::test]
    async fn query_returns_todays_events_filtered() {
        let (_temp, state) = test_state();
        log(&state, AuditEventType::MaintenanceModeChanged, "admin_1");
        log(&state, AuditEventType::MaintenanceContentUpdated, "admin_2");

        let params = AuditQueryParams {
            event_type: Some("maintenance_mode_changed".to_string()),
            ..Default::default()
        };
        let Json(response) = query_audit_logs(admin(), Query(params), State(state))
            .await
            .unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.events[0].user_id.as_deref(), Some("admin_1"));
        assert!(!response.has_more);
    }

    #[tokio::test]
    async fn query_paginates() {
        let (_temp, state) = test_state();
        for _ in 0..3 {
            log(&state, AuditEventType::MaintenanceContentReset, "admin_1");
        }

        let params = AuditQueryParams {
            user_id: Some("admin_1".to_string()),
            limit: Some(2),
            ..Default::default()
        };
        let Json(response) = query_audit_logs(admin(), Query(params), State(state))
            .await
            .unwrap();

        assert_eq!(response.total, 3);
        assert_eq!(response.events.len(), 2);
        assert!(response.has_more);
    }

    #[tokio::test]
    async fn query_rejects_bad_dates() {
        let (_temp, state) = test_state();
        let params = AuditQueryParams {
            start_date: Some("yesterday".to_string()),
            ..Default::default()
        };
        let err = query_audit_logs(admin(), Query(params), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn query_rejects_inverted_range() {
        let (_temp, state) = test_state();
        let params = AuditQueryParams {
            start_date: Some("2026-02-01".to_string()),
            end_date: Some("2026-01-01".to_string()),
            ..Default::default()
        };
        let err = query_audit_logs(admin(), Query(params), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn query_rejects_unbounded_range() {
        let (_temp, state) = test_state();
        let params = AuditQueryParams {
            start_date: Some("0001-01-01".to_string()),
            end_date: Some("9999-12-31".to_string()),
            ..Default::default()
        };
        let err = query_audit_logs(admin(), Query(params), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("at most 90 days"));
    }

    #[tokio::test]
    async fn query_accepts_range_at_the_cap() {
        let (_temp, state) = test_state();
        log(&state, AuditEventType::AdminAccess, "admin_1");

        let today = Utc::now().date_naive();
        let start = today - chrono::Duration::days(MAX_AUDIT_RANGE_DAYS - 1);
        let params = AuditQueryParams {
            start_date: Some(start.format("%Y-%m-%d").to_string()),
            end_date: Some(today.format("%Y-%m-%d").to_string()),
            ..Default::default()
        };
        let Json(response) = query_audit_logs(admin(), Query(params), State(state))
            .await
            .unwrap();
        assert_eq!(response.total, 1);
    }

    #[tokio::test]
    async fn detailed_health_reports_maintenance_flag() {
        let (_temp, state) = test_state();
        state.maintenance.set_mode(true);

        let Json(health) = get_detailed_health(admin(), State(state)).await;
        assert_eq!(health.status, "healthy");
        assert!(health.storage.initialized);
        assert!(health.maintenance_mode);
        assert!(!health.auth_configured);
    }
}
