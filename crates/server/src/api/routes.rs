use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use super::middleware::{auth_middleware, metrics_middleware};
use super::{announce, classroom, enrollment, handlers, nurse, passes, schedule, tickets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Enrollment workflow
        .route("/enrollment/{kind}/status", get(enrollment::status))
        .route("/enrollment/{kind}/approve", post(enrollment::approve))
        .route("/enrollment/{kind}/deny", post(enrollment::deny))
        .route("/enrollment/{kind}/link", post(enrollment::link_account))
        .route(
            "/enrollment/student/confirm-payment",
            post(enrollment::confirm_payment),
        )
        .route("/enrollment/scan", post(enrollment::scan_followups))
        // Tickets
        .route("/tickets", post(tickets::open_ticket))
        .route("/tickets/{channel_id}", delete(tickets::close_ticket))
        // Announcements and prompts
        .route("/announcements", post(announce::announce))
        .route("/bulletin", post(announce::bulletin))
        .route("/prompts/draw", get(announce::draw_prompt))
        .route("/prompts/post", post(announce::post_prompt))
        // Schedule
        .route("/schedule/today", get(schedule::today))
        .route("/schedule/week", get(schedule::week))
        .route("/schedule/blocks", post(schedule::set_block))
        .route("/schedule/{day}", delete(schedule::clear_day))
        // Classroom tools
        .route("/points", post(classroom::award_points))
        .route("/points/leaderboard", get(classroom::leaderboard))
        .route("/attendance/sessions", post(classroom::open_session))
        .route(
            "/attendance/sessions/{id}/mark",
            post(classroom::mark),
        )
        .route(
            "/attendance/sessions/{id}/close",
            post(classroom::close_session),
        )
        .route("/groups", post(classroom::groups))
        // Passes
        .route("/passes", post(passes::request_pass))
        .route("/passes/{id}/decide", post(passes::decide_pass))
        // Nurse station
        .route("/nurse/checkin", post(nurse::check_in))
        .route("/nurse/next", post(nurse::call_next))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::get_metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // A panicking handler still answers with a generic failure.
        .layer(tower_http::catch_panic::CatchPanicLayer::new())
}
