//! Announcements, bulletins and RP prompts.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use oscar_core::ChatClient;

use super::middleware::CurrentActor;
use super::{api_error, require_staff, ApiError};
use crate::state::AppState;

const CHAT_DOWN_MESSAGE: &str =
    "The chat platform is unavailable right now. Please try again later.";

#[derive(Debug, Deserialize)]
pub struct AnnounceBody {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub ping_everyone: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulletinBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PostedResponse {
    pub posted: bool,
    pub channel_id: String,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}

/// Post an academy announcement (staff).
pub async fn announce(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<AnnounceBody>,
) -> Result<Json<PostedResponse>, ApiError> {
    require_staff(&actor)?;
    let chat = chat(&state)?;
    let channel_id = channel(chat.announce_channel_id(), "Announcement")?;

    let prefix = if body.ping_everyone { "@everyone\n" } else { "" };
    let content = format!("{}**{}**\n{}", prefix, body.title.trim(), body.message);

    send(chat, &channel_id, &content).await?;
    state
        .post_log(&format!(
            "Announcement by {}: {}",
            actor.account_id,
            body.title.trim()
        ))
        .await;
    Ok(Json(PostedResponse {
        posted: true,
        channel_id,
    }))
}

/// Post a bulletin to the calendar channel (staff).
pub async fn bulletin(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<BulletinBody>,
) -> Result<Json<PostedResponse>, ApiError> {
    require_staff(&actor)?;
    let chat = chat(&state)?;
    let channel_id = channel(chat.calendar_channel_id(), "Calendar")?;

    let content = format!("**Daily Bulletin**\n{}", body.message);
    send(chat, &channel_id, &content).await?;
    state
        .post_log(&format!("Bulletin posted by {}", actor.account_id))
        .await;
    Ok(Json(PostedResponse {
        posted: true,
        channel_id,
    }))
}

/// Draw a random RP prompt without posting it.
pub async fn draw_prompt(State(state): State<Arc<AppState>>) -> Json<PromptResponse> {
    let prompt = state.campus().prompts.draw().await;
    Json(PromptResponse { prompt })
}

/// Post a random RP prompt to the student lounge (staff).
pub async fn post_prompt(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<PostedResponse>, ApiError> {
    require_staff(&actor)?;
    let chat = chat(&state)?;
    let channel_id = channel(chat.lounge_channel_id(), "Student lounge")?;

    let prompt = state.campus().prompts.draw().await;
    let content = format!("**Daily RP Prompt**\n{prompt}");
    send(chat, &channel_id, &content).await?;
    state.campus().prompts.mark_posted().await;

    state
        .post_log(&format!("Prompt posted by {}", actor.account_id))
        .await;
    Ok(Json(PostedResponse {
        posted: true,
        channel_id,
    }))
}

fn chat(state: &AppState) -> Result<&Arc<ChatClient>, ApiError> {
    state.chat().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "The chat platform is not configured on this server.",
        )
    })
}

fn channel(id: Option<&str>, name: &str) -> Result<String, ApiError> {
    id.map(str::to_string).ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("{name} channel is not configured."),
        )
    })
}

async fn send(chat: &ChatClient, channel_id: &str, content: &str) -> Result<(), ApiError> {
    chat.send_message(channel_id, content).await.map_err(|e| {
        error!("Chat post failure: {}", e);
        api_error(StatusCode::BAD_GATEWAY, CHAT_DOWN_MESSAGE)
    })
}
