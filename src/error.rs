//! Call session error types.
//!
//! Failures from the external collaborators (capture engine, transport
//! client) arrive as `anyhow::Error` and are wrapped here so the coordinator
//! can decide which ones are fatal:
//! - `CredentialError`: fatal to a fresh join, soft during renewal
//! - `DeviceError`: per device, degrades the call to fewer tracks
//! - `TransportJoinError`: fatal, surfaces as `SessionState::Failed`
//! - `TransportLeaveError`: logged only, never blocks device release

use crate::credential::ChannelId;
use crate::device::DeviceKind;
use crate::session::SessionState;
use thiserror::Error;

/// Why a credential could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialFailure {
    #[error("channel identifier is empty")]
    EmptyChannel,

    #[error("network failure: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("denied by issuing service (status {status}): {message}")]
    Denied { status: u16, message: String },
}

/// Credential fetch failed for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch credential for channel '{channel}': {cause}")]
pub struct CredentialError {
    pub channel: ChannelId,
    #[source]
    pub cause: CredentialFailure,
}

impl CredentialError {
    pub fn new(channel: ChannelId, cause: CredentialFailure) -> Self {
        Self { channel, cause }
    }
}

/// A local capture device could not be acquired.
#[derive(Debug, Error)]
#[error("{kind} unavailable: {cause}")]
pub struct DeviceError {
    pub kind: DeviceKind,
    #[source]
    pub cause: anyhow::Error,
}

/// The transport client rejected the join request.
#[derive(Debug, Error)]
#[error("transport join failed: {0}")]
pub struct TransportJoinError(#[source] pub anyhow::Error);

/// The transport client failed to leave the channel.
#[derive(Debug, Error)]
#[error("transport leave failed: {0}")]
pub struct TransportLeaveError(#[source] pub anyhow::Error);

/// Errors surfaced to the caller of `SessionCoordinator::start`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    TransportJoin(#[from] TransportJoinError),

    #[error("cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}
