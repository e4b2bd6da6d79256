//! Classroom tools: points, attendance and group assignment.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use oscar_core::campus::{
    make_groups, parse_mentions, AttendanceError, AttendanceStatus, LeaderboardEntry,
    SessionTotals,
};

use super::middleware::CurrentActor;
use super::{api_error, require_actor, require_staff, ApiError};
use crate::state::AppState;

/// Bounds accepted for one points award, matching the classroom command.
const POINTS_RANGE: std::ops::RangeInclusive<i64> = -500..=500;

const DEFAULT_LEADERBOARD_SIZE: usize = 10;
const MAX_LEADERBOARD_SIZE: usize = 50;

// ============================================================================
// Points
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AwardPointsBody {
    pub account_id: String,
    pub amount: i64,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct AwardPointsResponse {
    pub account_id: String,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

/// Award or deduct points (staff).
pub async fn award_points(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<AwardPointsBody>,
) -> Result<Json<AwardPointsResponse>, ApiError> {
    require_staff(&actor)?;

    if !POINTS_RANGE.contains(&body.amount) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Points must be between -500 and 500.",
        ));
    }
    if body.reason.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "A points change needs a reason.",
        ));
    }

    let total = state
        .campus()
        .points
        .award(&body.account_id, body.amount, body.reason.trim(), &actor.account_id)
        .await;

    state
        .post_log(&format!(
            "Points {} -> {} ({}) by {}",
            body.amount, body.account_id, body.reason.trim(), actor.account_id
        ))
        .await;
    Ok(Json(AwardPointsResponse {
        account_id: body.account_id,
        total,
    }))
}

/// Top students by points.
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> Json<LeaderboardResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
        .clamp(1, MAX_LEADERBOARD_SIZE);
    let entries = state.campus().points.leaderboard(limit).await;
    Json(LeaderboardResponse { entries })
}

// ============================================================================
// Attendance
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenSessionBody {
    pub class_name: String,
}

#[derive(Debug, Serialize)]
pub struct OpenSessionResponse {
    pub session_id: String,
    pub class_name: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkBody {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MarkResponse {
    pub session_id: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    pub session_id: String,
    pub totals: SessionTotals,
}

/// Open an attendance session (staff).
pub async fn open_session(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<OpenSessionBody>,
) -> Result<(StatusCode, Json<OpenSessionResponse>), ApiError> {
    require_staff(&actor)?;

    if body.class_name.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "A session needs a class name.",
        ));
    }

    let session_id = state
        .campus()
        .attendance
        .open_session(body.class_name.trim(), &actor.account_id)
        .await;

    state
        .post_log(&format!(
            "Attendance started {} ({}) by {}",
            session_id, body.class_name.trim(), actor.account_id
        ))
        .await;
    Ok((
        StatusCode::CREATED,
        Json(OpenSessionResponse {
            session_id,
            class_name: body.class_name.trim().to_string(),
        }),
    ))
}

/// Mark yourself in an open session.
pub async fn mark(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<MarkBody>,
) -> Result<Json<MarkResponse>, ApiError> {
    require_actor(&actor)?;

    let status = AttendanceStatus::parse(&body.status).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Unknown attendance status: {}", body.status),
        )
    })?;

    state
        .campus()
        .attendance
        .mark(&session_id, &actor.account_id, status)
        .await
        .map_err(map_attendance_error)?;

    Ok(Json(MarkResponse { session_id, status }))
}

/// Close a session and report totals (staff).
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<CloseSessionResponse>, ApiError> {
    require_staff(&actor)?;

    let totals = state
        .campus()
        .attendance
        .close(&session_id)
        .await
        .map_err(map_attendance_error)?;

    state
        .post_log(&format!(
            "Attendance closed {} by {}",
            session_id, actor.account_id
        ))
        .await;
    Ok(Json(CloseSessionResponse { session_id, totals }))
}

fn map_attendance_error(e: AttendanceError) -> ApiError {
    match e {
        AttendanceError::SessionNotFound(id) => {
            api_error(StatusCode::NOT_FOUND, format!("Session not found: {id}"))
        }
        AttendanceError::SessionClosed(id) => {
            api_error(StatusCode::CONFLICT, format!("Session is closed: {id}"))
        }
    }
}

// ============================================================================
// Groups
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GroupsBody {
    /// Mention string, e.g. "<@111> <@222> <@333>".
    pub mentions: String,
    pub size: usize,
}

#[derive(Debug, Serialize)]
pub struct GroupsResponse {
    pub groups: Vec<Vec<String>>,
}

/// Shuffle mentioned students into random groups (staff).
pub async fn groups(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<GroupsBody>,
) -> Result<Json<GroupsResponse>, ApiError> {
    require_staff(&actor)?;

    let members = parse_mentions(&body.mentions);
    let groups = make_groups(&members, body.size)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    state
        .post_log(&format!(
            "Groups generated by {} ({} groups)",
            actor.account_id,
            groups.len()
        ))
        .await;
    Ok(Json(GroupsResponse { groups }))
}
