//! Real-time transport client seam
//!
//! The media transport, ICE/SFU routing and codecs live in an external
//! real-time client library. The session core drives it through
//! `TransportClient` and consumes its notifications as `TransportEvent`s.

use crate::credential::{ChannelId, SessionCredential};
use crate::device::DeviceHandle;
use crate::participants::ParticipantId;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Kind of a published track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Audio,
    Video,
}

/// Everything the transport needs to join a channel
#[derive(Debug, Clone)]
pub struct JoinParams {
    /// Application identifier registered with the media backend
    pub app_id: String,
    pub channel: ChannelId,
    pub credential: SessionCredential,
}

/// Notifications delivered by the transport client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    ParticipantJoined(ParticipantId),
    ParticipantLeft(ParticipantId),
    TrackPublished(ParticipantId, TrackKind),
    TrackUnpublished(ParticipantId, TrackKind),
    /// Fired with enough lead time for one credential fetch round-trip
    CredentialExpiringSoon,
}

#[async_trait::async_trait]
pub trait TransportClient: Send + Sync {
    async fn join(&self, params: &JoinParams) -> Result<()>;

    /// Hand a fresh credential to the live connection without reconnecting
    async fn renew_credential(&self, credential: &SessionCredential) -> Result<()>;

    async fn leave(&self) -> Result<()>;

    async fn publish(&self, tracks: &[DeviceHandle]) -> Result<()>;

    /// Start playback of a remote participant's audio track
    fn play_remote_audio(&self, participant: &ParticipantId) -> Result<()>;
}
