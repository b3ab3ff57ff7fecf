//! HTTP control surface for the call
//!
//! Exposes the presentation snapshot and local controls:
//! - GET /call - Current `CallView`
//! - POST /call/mute - Toggle microphone mute
//! - POST /call/leave - End the call
//! - GET /health - Health check

mod handlers;
mod routes;
mod server;
mod state;

pub use routes::create_router;
pub use server::{bind, serve};
pub use state::AppState;
