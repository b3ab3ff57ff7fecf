pub mod backend;
pub mod manager;

pub use backend::{DeviceHandle, DeviceKind, MediaDevices};
pub use manager::{DeviceManager, LocalDeviceState};
