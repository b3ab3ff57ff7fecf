//! Call session management
//!
//! This module provides the `SessionCoordinator` that manages:
//! - Local device acquisition before joining
//! - Credential fetch and transport join
//! - Credential renewal while joined
//! - Explicit teardown that always releases local devices

mod config;
mod coordinator;
mod state;

pub use config::SessionConfig;
pub use coordinator::SessionCoordinator;
pub use state::{FailureReason, SessionState};
