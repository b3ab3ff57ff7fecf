use crate::transport::TrackKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Opaque identifier of a remote participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A remote participant and the tracks they currently publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: ParticipantId,
    pub has_audio: bool,
    pub has_video: bool,
}

impl ParticipantRecord {
    fn new(id: ParticipantId) -> Self {
        Self {
            id,
            has_audio: false,
            has_video: false,
        }
    }

    fn track_mut(&mut self, kind: TrackKind) -> &mut bool {
        match kind {
            TrackKind::Audio => &mut self.has_audio,
            TrackKind::Video => &mut self.has_video,
        }
    }
}

/// Remote participants present in the channel, in arrival order
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    records: RwLock<Vec<ParticipantRecord>>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn joined(&self, id: ParticipantId) {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == id) {
            debug!("Participant {} already present", id);
            return;
        }
        info!("Participant {} joined", id);
        records.push(ParticipantRecord::new(id));
    }

    pub async fn left(&self, id: &ParticipantId) {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() < before {
            info!("Participant {} left", id);
        } else {
            debug!("Unknown participant {} left", id);
        }
    }

    /// Record a published track.
    ///
    /// Returns true when this is a newly observed audio track, i.e. the
    /// caller should start playing it. Publishing for an unknown participant
    /// adds them.
    pub async fn track_published(&self, id: ParticipantId, kind: TrackKind) -> bool {
        let mut records = self.records.write().await;

        let index = match records.iter().position(|r| r.id == id) {
            Some(index) => index,
            None => {
                debug!("Track published by unseen participant {}; adding", id);
                records.push(ParticipantRecord::new(id));
                records.len() - 1
            }
        };

        let Some(record) = records.get_mut(index) else {
            return false;
        };
        let flag = record.track_mut(kind);
        let newly_observed = !*flag;
        *flag = true;

        newly_observed && kind == TrackKind::Audio
    }

    pub async fn track_unpublished(&self, id: &ParticipantId, kind: TrackKind) {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| &r.id == id) {
            Some(record) => *record.track_mut(kind) = false,
            None => debug!("Track unpublished by unknown participant {}", id),
        }
    }

    /// Point-in-time copy, stable in order while membership is unchanged
    pub async fn snapshot(&self) -> Vec<ParticipantRecord> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: &ParticipantId) -> Option<ParticipantRecord> {
        self.records.read().await.iter().find(|r| &r.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}
