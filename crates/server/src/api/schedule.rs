//! Schedule handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use oscar_core::campus::{ScheduleBlock, ScheduleBook, SchoolDay};

use super::middleware::CurrentActor;
use super::{api_error, require_staff, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub day: String,
    pub blocks: Vec<ScheduleBlock>,
    pub rendered: String,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub days: Vec<DayResponse>,
}

#[derive(Debug, Deserialize)]
pub struct SetBlockBody {
    pub day: String,
    pub label: String,
    pub details: String,
    pub position: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SetBlockResponse {
    pub day: String,
    pub position: usize,
}

/// Today's schedule, by the configured local offset. Weekends report no
/// school day.
pub async fn today(State(state): State<Arc<AppState>>) -> Json<DayResponse> {
    let offset = state.config().scheduler.utc_offset_hours;
    let local = Utc::now() + Duration::hours(offset as i64);

    match SchoolDay::from_weekday(local.weekday()) {
        Some(day) => {
            let blocks = state.campus().schedule.day_blocks(day).await;
            let rendered = ScheduleBook::render_blocks(&blocks);
            Json(DayResponse {
                day: day.label().to_string(),
                blocks,
                rendered,
            })
        }
        None => {
            let day = if local.weekday() == chrono::Weekday::Sat {
                "Saturday"
            } else {
                "Sunday"
            };
            Json(DayResponse {
                day: day.to_string(),
                blocks: Vec::new(),
                rendered: "No classes today.".to_string(),
            })
        }
    }
}

/// The full weekly schedule.
pub async fn week(State(state): State<Arc<AppState>>) -> Json<WeekResponse> {
    let days = state
        .campus()
        .schedule
        .week()
        .await
        .into_iter()
        .map(|(day, blocks)| {
            let rendered = ScheduleBook::render_blocks(&blocks);
            DayResponse {
                day: day.label().to_string(),
                blocks,
                rendered,
            }
        })
        .collect();
    Json(WeekResponse { days })
}

/// Add a schedule block (staff).
pub async fn set_block(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<SetBlockBody>,
) -> Result<Json<SetBlockResponse>, ApiError> {
    require_staff(&actor)?;
    let day = parse_day(&body.day)?;

    if body.label.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "A schedule block needs a label.",
        ));
    }

    let position = state
        .campus()
        .schedule
        .set_block(
            day,
            body.label.trim().to_string(),
            body.details.trim().to_string(),
            body.position,
            &actor.account_id,
        )
        .await;

    state
        .post_log(&format!(
            "Schedule updated by {} ({}): {}",
            actor.account_id, day, body.label.trim()
        ))
        .await;
    Ok(Json(SetBlockResponse {
        day: day.label().to_string(),
        position,
    }))
}

/// Clear a day's schedule (staff).
pub async fn clear_day(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<DayResponse>, ApiError> {
    require_staff(&actor)?;
    let day = parse_day(&day)?;

    state.campus().schedule.clear_day(day).await;
    state
        .post_log(&format!("Schedule cleared for {} by {}", day, actor.account_id))
        .await;
    Ok(Json(DayResponse {
        day: day.label().to_string(),
        blocks: Vec::new(),
        rendered: ScheduleBook::render_blocks(&[]),
    }))
}

fn parse_day(day: &str) -> Result<SchoolDay, ApiError> {
    day.parse()
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, format!("Not a school day: {day}")))
}
