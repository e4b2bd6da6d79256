//! HTTP command surface.

pub mod announce;
pub mod classroom;
pub mod enrollment;
pub mod handlers;
pub mod middleware;
pub mod nurse;
pub mod passes;
pub mod routes;
pub mod schedule;
pub mod tickets;

pub use routes::create_router;

use axum::http::StatusCode;
use axum::Json;
use oscar_core::Actor;
use serde::Serialize;

/// Shared error body for all API responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Generic message for unexpected internal failures: the caller is never
/// left hanging, and never sees internals.
pub fn internal_error() -> ApiError {
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Something went wrong while processing that. Staff have been notified.",
    )
}

/// Reject non-staff actors on staff-gated routes.
pub fn require_staff(actor: &Actor) -> Result<(), ApiError> {
    if actor.staff {
        Ok(())
    } else {
        Err(api_error(StatusCode::FORBIDDEN, "Staff only."))
    }
}

/// Reject requests with no authenticated actor.
pub fn require_actor(actor: &Actor) -> Result<(), ApiError> {
    if actor.is_anonymous() {
        Err(api_error(
            StatusCode::UNAUTHORIZED,
            "An account identity is required for this action.",
        ))
    } else {
        Ok(())
    }
}
