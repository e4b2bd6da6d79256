//! Enrollment workflow handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use oscar_core::{
    project, ApplicantKind, DecisionOutcome, EnrollmentError, EnrollmentService, LinkOutcome,
    Resolution, ScanSummary, StatusView,
};

use super::middleware::CurrentActor;
use super::{api_error, require_staff, ApiError};
use crate::metrics::{ENROLLMENT_DECISIONS_TOTAL, NOTIFY_RESULTS_TOTAL};
use crate::state::AppState;

const STORE_DOWN_MESSAGE: &str =
    "The record service is unavailable right now. Please try again later.";

const ACCESS_BLOCKED_MESSAGE: &str =
    "That record is linked to a different account. If you believe it is yours, \
     open a support ticket and staff will help.";

const NOT_CONFIGURED_MESSAGE: &str = "Application records are not configured on this server.";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub handle: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub handle: String,
    pub kind: ApplicantKind,
    #[serde(flatten)]
    pub view: StatusView,
}

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub handle: String,
    pub next_steps: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DenyBody {
    pub handle: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentBody {
    pub handle: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkBody {
    pub handle: String,
    pub account_id: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Self-service status lookup.
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<StatusParams>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<StatusResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let service = enrollment(&state)?;

    let resolution = service
        .lookup(kind, &params.handle, &actor)
        .await
        .map_err(|e| map_error(EnrollmentError::Store(e)))?;

    match resolution {
        Resolution::Found { record, .. } => {
            let view = project(&record, kind, actor.staff);
            Ok(Json(StatusResponse {
                handle: record.handle,
                kind,
                view,
            }))
        }
        Resolution::NotFound { reason } => Err(api_error(StatusCode::NOT_FOUND, reason)),
        Resolution::AccessBlocked => {
            Err(api_error(StatusCode::FORBIDDEN, ACCESS_BLOCKED_MESSAGE))
        }
    }
}

/// Approve an application (staff).
pub async fn approve(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<ApproveBody>,
) -> Result<Json<DecisionOutcome>, ApiError> {
    require_staff(&actor)?;
    let kind = parse_kind(&kind)?;
    let service = enrollment(&state)?;

    let outcome = service
        .approve(kind, &body.handle, body.next_steps.as_deref(), &actor)
        .await
        .inspect_err(|_| record_decision("approve", "error"))
        .map_err(map_error)?;

    record_decision("approve", "ok");
    record_notify(outcome.notified);
    state
        .post_log(&format!(
            "Application approved: {}/{} by {}",
            kind, outcome.handle, actor.account_id
        ))
        .await;
    Ok(Json(outcome))
}

/// Deny an application (staff).
pub async fn deny(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<DenyBody>,
) -> Result<Json<DecisionOutcome>, ApiError> {
    require_staff(&actor)?;
    let kind = parse_kind(&kind)?;
    let service = enrollment(&state)?;

    if body.reason.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "A denial needs a reason.",
        ));
    }

    let outcome = service
        .deny(kind, &body.handle, body.reason.trim(), &actor)
        .await
        .inspect_err(|_| record_decision("deny", "error"))
        .map_err(map_error)?;

    record_decision("deny", "ok");
    record_notify(outcome.notified);
    state
        .post_log(&format!(
            "Application denied: {}/{} by {}",
            kind, outcome.handle, actor.account_id
        ))
        .await;
    Ok(Json(outcome))
}

/// Confirm a student's tuition payment (staff).
pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<ConfirmPaymentBody>,
) -> Result<Json<DecisionOutcome>, ApiError> {
    require_staff(&actor)?;
    let service = enrollment(&state)?;

    let outcome = service
        .confirm_payment(&body.handle, body.notes.as_deref(), &actor)
        .await
        .inspect_err(|_| record_decision("confirm_payment", "error"))
        .map_err(map_error)?;

    record_decision("confirm_payment", "ok");
    record_notify(outcome.notified);
    state
        .post_log(&format!(
            "Enrollment completed: student/{} by {}",
            outcome.handle, actor.account_id
        ))
        .await;
    Ok(Json(outcome))
}

/// Bind a platform account to a record (staff).
pub async fn link_account(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<LinkBody>,
) -> Result<Json<LinkOutcome>, ApiError> {
    require_staff(&actor)?;
    let kind = parse_kind(&kind)?;
    let service = enrollment(&state)?;

    let outcome = service
        .link_account(kind, &body.handle, &body.account_id, &actor)
        .await
        .map_err(map_error)?;

    state
        .post_log(&format!(
            "Account linked: {}/{} -> {} by {}",
            kind, outcome.handle, outcome.linked_account_id, actor.account_id
        ))
        .await;
    Ok(Json(outcome))
}

/// Scan the student store for records missing their follow-up signature and
/// remind the linked ones (staff).
pub async fn scan_followups(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<ScanSummary>, ApiError> {
    require_staff(&actor)?;
    let service = enrollment(&state)?;

    let summary = service.scan_missing_followups().await.map_err(map_error)?;

    state
        .post_log(&format!(
            "Follow-up scan by {}: {} scanned, {} notified, {} failed, {} unlinked",
            actor.account_id,
            summary.scanned,
            summary.notified,
            summary.failed,
            summary.skipped_unlinked
        ))
        .await;
    Ok(Json(summary))
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_kind(kind: &str) -> Result<ApplicantKind, ApiError> {
    kind.parse().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Unknown application type: {kind}"),
        )
    })
}

fn enrollment(state: &AppState) -> Result<&Arc<EnrollmentService>, ApiError> {
    state
        .enrollment()
        .ok_or_else(|| api_error(StatusCode::SERVICE_UNAVAILABLE, NOT_CONFIGURED_MESSAGE))
}

fn map_error(e: EnrollmentError) -> ApiError {
    match e {
        EnrollmentError::NotFound(reason) => api_error(StatusCode::NOT_FOUND, reason),
        EnrollmentError::AccessBlocked => {
            api_error(StatusCode::FORBIDDEN, ACCESS_BLOCKED_MESSAGE)
        }
        EnrollmentError::InvalidArgument(message) => api_error(StatusCode::BAD_REQUEST, message),
        EnrollmentError::Store(err) => {
            error!("Record store failure: {}", err);
            api_error(StatusCode::BAD_GATEWAY, STORE_DOWN_MESSAGE)
        }
    }
}

fn record_decision(action: &str, outcome: &str) {
    ENROLLMENT_DECISIONS_TOTAL
        .with_label_values(&[action, outcome])
        .inc();
}

fn record_notify(delivered: bool) {
    let result = if delivered { "delivered" } else { "failed" };
    NOTIFY_RESULTS_TOTAL.with_label_values(&[result]).inc();
}
