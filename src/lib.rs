pub mod config;
pub mod controls;
pub mod credential;
pub mod device;
pub mod error;
pub mod http;
pub mod layout;
pub mod participants;
pub mod session;
pub mod transport;

pub use config::Config;
pub use controls::{CallView, ControlSurface};
pub use credential::{ChannelId, CredentialFetcher, HttpCredentialFetcher, SessionCredential};
pub use device::{DeviceHandle, DeviceKind, DeviceManager, LocalDeviceState, MediaDevices};
pub use error::{
    CredentialError, CredentialFailure, DeviceError, SessionError, TransportJoinError,
    TransportLeaveError,
};
pub use http::{create_router, AppState};
pub use layout::{columns, GridLayout};
pub use participants::{ParticipantId, ParticipantRecord, ParticipantRegistry};
pub use session::{FailureReason, SessionConfig, SessionCoordinator, SessionState};
pub use transport::{JoinParams, TrackKind, TransportClient, TransportEvent};
