//! Hall pass handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use oscar_core::campus::{Pass, PassError, PassReason};

use super::middleware::CurrentActor;
use super::{api_error, require_actor, require_staff, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RequestPassBody {
    pub reason: String,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DecidePassBody {
    pub approve: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecidePassResponse {
    #[serde(flatten)]
    pub pass: Pass,
    /// Whether the student's DM notification was delivered. Best effort;
    /// the decision stands either way.
    pub notified: bool,
}

/// Request a pass.
pub async fn request_pass(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<RequestPassBody>,
) -> Result<(StatusCode, Json<Pass>), ApiError> {
    require_actor(&actor)?;

    let reason = PassReason::parse(&body.reason).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Unknown pass reason: {}", body.reason),
        )
    })?;

    let pass = state
        .campus()
        .passes
        .request(&actor.account_id, reason, body.details.as_deref().unwrap_or(""))
        .await;

    state
        .post_log(&format!(
            "Pass requested {} by {} ({})",
            pass.id,
            actor.account_id,
            reason.label()
        ))
        .await;
    Ok((StatusCode::CREATED, Json(pass)))
}

/// Decide a pending pass and DM the student (staff).
pub async fn decide_pass(
    State(state): State<Arc<AppState>>,
    Path(pass_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<DecidePassBody>,
) -> Result<Json<DecidePassResponse>, ApiError> {
    require_staff(&actor)?;

    let pass = state
        .campus()
        .passes
        .decide(&pass_id, body.approve, body.notes.clone(), &actor.account_id)
        .await
        .map_err(map_error)?;

    let message = decision_message(&pass);
    let notified = state.notifier().notify(&pass.student_id, &message).await;

    state
        .post_log(&format!(
            "Pass {} -> {} by {}",
            pass.id,
            pass.status.label(),
            actor.account_id
        ))
        .await;
    Ok(Json(DecidePassResponse { pass, notified }))
}

fn decision_message(pass: &Pass) -> String {
    let mut message = format!(
        "Your pass request ({}) was {}.\nReason: {}",
        pass.id,
        pass.status.label().to_uppercase(),
        pass.reason.label()
    );
    if !pass.details.is_empty() {
        message.push_str(&format!("\nDetails: {}", pass.details));
    }
    if let Some(notes) = &pass.notes {
        message.push_str(&format!("\nNotes: {notes}"));
    }
    message
}

fn map_error(e: PassError) -> ApiError {
    match e {
        PassError::NotFound(id) => api_error(StatusCode::NOT_FOUND, format!("Pass not found: {id}")),
        PassError::AlreadyDecided { id, status } => api_error(
            StatusCode::CONFLICT,
            format!("Pass {id} already decided: {status}"),
        ),
    }
}
