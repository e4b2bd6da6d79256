//! Health, config and metrics handlers.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use oscar_core::SanitizedConfig;

use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current configuration with secrets redacted.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// Prometheus metrics in text format.
pub async fn get_metrics() -> String {
    metrics::render()
}
