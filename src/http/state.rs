use crate::controls::ControlSurface;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Controls of the call this process participates in
    pub controls: Arc<ControlSurface>,
}

impl AppState {
    pub fn new(controls: Arc<ControlSurface>) -> Self {
        Self { controls }
    }
}
