//! Local call controls and the presentation snapshot
//!
//! `ControlSurface` is what a UI binds to: the mute toggle, the end-call
//! action, and `view()` which gathers everything needed to draw one frame.

use crate::device::LocalDeviceState;
use crate::layout::GridLayout;
use crate::participants::ParticipantRecord;
use crate::session::{SessionCoordinator, SessionState};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Read-only snapshot for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct CallView {
    pub state: SessionState,
    /// Either device acquisition still in flight
    pub loading_devices: bool,
    pub local: LocalDeviceState,
    pub participants: Vec<ParticipantRecord>,
    pub layout: GridLayout,
    pub muted: bool,
    pub mute_label: &'static str,
}

pub struct ControlSurface {
    coordinator: Arc<SessionCoordinator>,
    muted: AtomicBool,
}

impl ControlSurface {
    pub fn new(coordinator: Arc<SessionCoordinator>) -> Self {
        Self {
            coordinator,
            muted: AtomicBool::new(false),
        }
    }

    pub fn coordinator(&self) -> &Arc<SessionCoordinator> {
        &self.coordinator
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    /// Flip the mute flag and enable the microphone when unmuted.
    ///
    /// Returns the new flag.
    pub fn toggle_mute(&self) -> bool {
        let muted = !self.muted.fetch_xor(true, Ordering::SeqCst);
        info!("Microphone {}", if muted { "muted" } else { "unmuted" });
        self.coordinator.devices().set_microphone_enabled(!muted);
        muted
    }

    /// End the call
    pub async fn leave(&self) {
        self.coordinator.leave().await;
    }

    pub async fn view(&self) -> CallView {
        let participants = self.coordinator.participants().snapshot().await;
        let devices = self.coordinator.devices();
        let muted = self.is_muted();

        CallView {
            state: self.coordinator.state(),
            loading_devices: devices.is_loading(),
            local: devices.snapshot(),
            layout: GridLayout::for_remote_count(participants.len()),
            participants,
            muted,
            mute_label: if muted { "Unmute" } else { "Mute" },
        }
    }
}
