use super::backend::{DeviceHandle, DeviceKind, MediaDevices};
use crate::error::DeviceError;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Local camera and microphone state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalDeviceState {
    pub camera: Option<DeviceHandle>,
    pub microphone: Option<DeviceHandle>,
    pub loading_camera: bool,
    pub loading_microphone: bool,
    /// Requested microphone state, applied to the track whenever it lands
    pub microphone_enabled: bool,
}

impl Default for LocalDeviceState {
    fn default() -> Self {
        Self {
            camera: None,
            microphone: None,
            loading_camera: false,
            loading_microphone: false,
            microphone_enabled: true,
        }
    }
}

impl LocalDeviceState {
    fn slot(&mut self, kind: DeviceKind) -> &mut Option<DeviceHandle> {
        match kind {
            DeviceKind::Camera => &mut self.camera,
            DeviceKind::Microphone => &mut self.microphone,
        }
    }

    fn loading(&mut self, kind: DeviceKind) -> &mut bool {
        match kind {
            DeviceKind::Camera => &mut self.loading_camera,
            DeviceKind::Microphone => &mut self.loading_microphone,
        }
    }
}

/// Owns the local capture devices
///
/// Every handle it hands out is closed exactly once through `release`;
/// callers only ever hold clones for publishing.
pub struct DeviceManager {
    backend: Arc<dyn MediaDevices>,
    state: Mutex<LocalDeviceState>,
}

impl DeviceManager {
    pub fn new(backend: Arc<dyn MediaDevices>) -> Self {
        info!("Device manager using {}", backend.name());

        Self {
            backend,
            state: Mutex::new(LocalDeviceState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LocalDeviceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn acquire_camera(&self) -> Result<DeviceHandle, DeviceError> {
        self.acquire(DeviceKind::Camera).await
    }

    pub async fn acquire_microphone(&self) -> Result<DeviceHandle, DeviceError> {
        self.acquire(DeviceKind::Microphone).await
    }

    /// Open a device, reporting it as loading until the attempt settles
    pub async fn acquire(&self, kind: DeviceKind) -> Result<DeviceHandle, DeviceError> {
        *self.lock().loading(kind) = true;

        let result = self.backend.open(kind).await;

        let mut state = self.lock();
        *state.loading(kind) = false;

        match result {
            Ok(handle) => {
                if let Some(previous) = state.slot(kind).replace(handle.clone()) {
                    warn!("Replacing open {} track {}", kind, previous.id);
                    self.backend.close(&previous);
                }
                info!("Acquired {} track {}", kind, handle.id);

                if kind == DeviceKind::Microphone && !state.microphone_enabled {
                    info!("Microphone muted while loading; disabling track {}", handle.id);
                    if let Err(e) = self.backend.set_enabled(&handle, false) {
                        warn!("Failed to disable microphone track {}: {:#}", handle.id, e);
                    }
                }

                Ok(handle)
            }
            Err(cause) => {
                warn!("Failed to acquire {}: {:#}", kind, cause);
                Err(DeviceError { kind, cause })
            }
        }
    }

    /// Close the track behind `handle` if it is still held.
    ///
    /// Releasing twice, or releasing a handle that has since been replaced,
    /// is a no-op.
    pub fn release(&self, handle: &DeviceHandle) {
        let held = {
            let mut state = self.lock();
            let slot = state.slot(handle.kind);
            if slot.as_ref() == Some(handle) {
                slot.take()
            } else {
                None
            }
        };

        match held {
            Some(handle) => {
                self.backend.close(&handle);
                info!("Released {} track {}", handle.kind, handle.id);
            }
            None => debug!("{} track {} not held; nothing to release", handle.kind, handle.id),
        }
    }

    /// Close every held track
    pub fn release_all(&self) {
        let held: Vec<DeviceHandle> = {
            let mut state = self.lock();
            state.microphone.take().into_iter().chain(state.camera.take()).collect()
        };

        for handle in held {
            self.backend.close(&handle);
            info!("Released {} track {}", handle.kind, handle.id);
        }
    }

    /// Toggle the published audio without closing the microphone.
    ///
    /// While no microphone is held the request is remembered and applied
    /// once the track is acquired.
    pub fn set_microphone_enabled(&self, enabled: bool) {
        let microphone = {
            let mut state = self.lock();
            state.microphone_enabled = enabled;
            state.microphone.clone()
        };

        let Some(microphone) = microphone else {
            debug!("No microphone track yet; will apply enabled={} on acquire", enabled);
            return;
        };

        if let Err(e) = self.backend.set_enabled(&microphone, enabled) {
            warn!("Failed to set microphone enabled={}: {:#}", enabled, e);
        }
    }

    pub fn snapshot(&self) -> LocalDeviceState {
        self.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        let state = self.lock();
        state.loading_camera || state.loading_microphone
    }

    pub fn handles(&self) -> Vec<DeviceHandle> {
        let state = self.lock();
        state.microphone.iter().chain(state.camera.iter()).cloned().collect()
    }

    pub fn holds_any(&self) -> bool {
        let state = self.lock();
        state.camera.is_some() || state.microphone.is_some()
    }
}
