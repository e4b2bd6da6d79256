//! Nurse station handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use oscar_core::campus::NurseEntry;

use super::middleware::CurrentActor;
use super::{api_error, require_actor, require_staff, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckInBody {
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub position: usize,
}

#[derive(Debug, Serialize)]
pub struct NextResponse {
    /// The called student, or `None` when the queue is empty.
    pub next: Option<NurseEntry>,
}

/// Check in with the nurse.
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<CheckInBody>,
) -> Result<Json<CheckInResponse>, ApiError> {
    require_actor(&actor)?;

    if body.reason.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "A check-in needs a reason.",
        ));
    }

    let position = state
        .campus()
        .nurse
        .check_in(&actor.account_id, body.reason.trim())
        .await;

    state
        .post_log(&format!("Nurse check-in by {}", actor.account_id))
        .await;
    Ok(Json(CheckInResponse { position }))
}

/// Call the next student in the queue (staff).
pub async fn call_next(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<NextResponse>, ApiError> {
    require_staff(&actor)?;

    let next = state.campus().nurse.call_next().await;
    if let Some(entry) = &next {
        state
            .post_log(&format!("Nurse calling next: {}", entry.account_id))
            .await;
    }
    Ok(Json(NextResponse { next }))
}
