//! Ticket handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use oscar_core::{project, Resolution, TicketContext, TicketError, TicketGateway};

use super::middleware::CurrentActor;
use super::{api_error, require_actor, require_staff, ApiError};
use crate::metrics::TICKETS_OPENED_TOTAL;
use crate::state::AppState;

const NOT_CONFIGURED_MESSAGE: &str = "Ticketing is not available on this server.";

const DEFAULT_CLOSING_NOTICE: &str = "This ticket is now closed. Thanks for reaching out!";

#[derive(Debug, Default, Deserialize)]
pub struct OpenTicketBody {
    /// Application type of the requester's record, when known.
    pub kind: Option<String>,
    /// Handle of the requester's record, when known.
    pub handle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub channel_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CloseTicketBody {
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CloseTicketResponse {
    pub channel_id: String,
    pub closed: bool,
}

/// Open a support ticket for the requesting account.
///
/// When the requester names their record, its current status is captured
/// into the channel's opening message; a record that cannot be resolved (or
/// is gated to someone else) yields a generic snapshot instead of an error,
/// since the whole point of a ticket is reaching staff.
pub async fn open_ticket(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    body: Option<Json<OpenTicketBody>>,
) -> Result<(StatusCode, Json<TicketResponse>), ApiError> {
    require_actor(&actor)?;
    let gateway = gateway(&state)?;
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let context = build_context(&state, &actor, &body).await;

    let channel = gateway
        .open_ticket(&actor.account_id, &context)
        .await
        .map_err(map_error)?;

    TICKETS_OPENED_TOTAL.inc();
    state
        .post_log(&format!(
            "Ticket opened by {} ({})",
            actor.account_id, channel
        ))
        .await;
    Ok((
        StatusCode::CREATED,
        Json(TicketResponse {
            channel_id: channel.0,
        }),
    ))
}

/// Close a ticket channel after posting a notice (staff).
pub async fn close_ticket(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
    CurrentActor(actor): CurrentActor,
    body: Option<Json<CloseTicketBody>>,
) -> Result<Json<CloseTicketResponse>, ApiError> {
    require_staff(&actor)?;
    let gateway = gateway(&state)?;

    let notice = body
        .and_then(|Json(b)| b.notice)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CLOSING_NOTICE.to_string());

    gateway
        .close_ticket(&oscar_core::ChannelRef(channel_id.clone()), &notice)
        .await
        .map_err(map_error)?;

    state
        .post_log(&format!(
            "Ticket {} closed by {}",
            channel_id, actor.account_id
        ))
        .await;
    Ok(Json(CloseTicketResponse {
        channel_id,
        closed: true,
    }))
}

/// Snapshot the requester's record for the opening message, best effort.
async fn build_context(state: &AppState, actor: &oscar_core::Actor, body: &OpenTicketBody) -> TicketContext {
    let (Some(kind_raw), Some(handle)) = (&body.kind, &body.handle) else {
        return TicketContext::unresolved();
    };
    let Ok(kind) = kind_raw.parse::<oscar_core::ApplicantKind>() else {
        return TicketContext::unresolved();
    };
    let Some(service) = state.enrollment() else {
        return TicketContext::unresolved();
    };

    match service.lookup(kind, handle, actor).await {
        Ok(Resolution::Found { record, .. }) => {
            // Applicant-safe fields only; the snapshot is visible to the
            // requester.
            let view = project(&record, kind, false);
            TicketContext {
                handle: record.handle,
                kind: Some(kind),
                status: view.status,
                next_steps: view.next_steps,
            }
        }
        _ => TicketContext::unresolved(),
    }
}

fn gateway(state: &AppState) -> Result<&Arc<dyn TicketGateway>, ApiError> {
    state
        .tickets()
        .ok_or_else(|| api_error(StatusCode::SERVICE_UNAVAILABLE, NOT_CONFIGURED_MESSAGE))
}

fn map_error(e: TicketError) -> ApiError {
    match e {
        TicketError::NotConfigured => {
            api_error(StatusCode::SERVICE_UNAVAILABLE, NOT_CONFIGURED_MESSAGE)
        }
        TicketError::Platform(err) => {
            error!("Ticket platform failure: {}", err);
            api_error(
                StatusCode::BAD_GATEWAY,
                "The chat platform is unavailable right now. Please try again later.",
            )
        }
    }
}
