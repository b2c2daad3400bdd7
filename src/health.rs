use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    /// `live` when a credential is configured, otherwise `mock`.
    pub upstream: &'static str,
    pub model: String,
}

pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "ok" })
}

/// Mock mode is a supported configuration, so readiness never fails on it.
pub async fn readiness(State(state): State<Arc<AppState>>) -> Json<ReadinessResponse> {
    let live = state.assistant.has_credential();
    if !live {
        tracing::debug!("Readiness check: running without upstream credential");
    }
    Json(ReadinessResponse {
        status: "ready",
        upstream: if live { "live" } else { "mock" },
        model: state.assistant.config().model.clone(),
    })
}
