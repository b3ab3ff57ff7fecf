use super::state::AppState;
use crate::session::SessionState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct MuteResponse {
    pub muted: bool,
}

#[derive(Debug, Serialize)]
pub struct LeaveResponse {
    pub channel: String,
    pub state: SessionState,
}

/// GET /call
/// Snapshot of session state, participants, layout and mute flag
pub async fn get_call_view(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.controls.view().await;
    (StatusCode::OK, Json(view))
}

/// POST /call/mute
/// Toggle microphone mute
pub async fn toggle_mute(State(state): State<AppState>) -> impl IntoResponse {
    let muted = state.controls.toggle_mute();
    (StatusCode::OK, Json(MuteResponse { muted }))
}

/// POST /call/leave
/// End the call; devices are released before this returns
pub async fn leave_call(State(state): State<AppState>) -> impl IntoResponse {
    let coordinator = state.controls.coordinator();
    info!("Leave requested for channel: {}", coordinator.channel());

    state.controls.leave().await;

    (
        StatusCode::OK,
        Json(LeaveResponse {
            channel: coordinator.channel().to_string(),
            state: coordinator.state(),
        }),
    )
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
