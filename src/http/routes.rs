use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Presentation snapshot
        .route("/call", get(handlers::get_call_view))
        // Local controls
        .route("/call/mute", post(handlers::toggle_mute))
        .route("/call/leave", post(handlers::leave_call))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
