use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local capture device type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Camera,
    Microphone,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Camera => f.write_str("camera"),
            DeviceKind::Microphone => f.write_str("microphone"),
        }
    }
}

/// Handle to an open local track
///
/// The capture engine identifies the track by `id`; the handle itself holds
/// no media resources, so it can be cloned into the transport for publishing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceHandle {
    pub id: String,
    pub kind: DeviceKind,
}

impl DeviceHandle {
    pub fn new(id: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Local capture engine trait
///
/// Implemented by the real-time client library that owns the camera and
/// microphone. Opening may take a while (permission prompts, hardware
/// warm-up) and camera and microphone may be opened concurrently.
#[async_trait::async_trait]
pub trait MediaDevices: Send + Sync {
    /// Open a local track for the device
    async fn open(&self, kind: DeviceKind) -> Result<DeviceHandle>;

    /// Enable or disable a track without closing the device
    fn set_enabled(&self, handle: &DeviceHandle, enabled: bool) -> Result<()>;

    /// Close the track and free the device
    fn close(&self, handle: &DeviceHandle);

    /// Get backend name for logging
    fn name(&self) -> &str;
}
