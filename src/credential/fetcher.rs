use crate::error::CredentialError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque name of the call channel, fixed for the life of a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ChannelId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Short-lived access credential for one channel
///
/// Expiry is implicit: the transport client announces it through a
/// `CredentialExpiringSoon` event. A renewal replaces the whole value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential {
    token: String,
    channel: ChannelId,
    fetched_at: DateTime<Utc>,
}

impl SessionCredential {
    pub fn new(channel: ChannelId, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            channel,
            fetched_at: Utc::now(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredential")
            .field("token", &"[REDACTED]")
            .field("channel", &self.channel)
            .field("fetched_at", &self.fetched_at)
            .finish()
    }
}

/// Obtains a fresh credential for a channel
///
/// Implementations make exactly one request per call and never retry;
/// retry policy belongs to the caller.
#[async_trait::async_trait]
pub trait CredentialFetcher: Send + Sync {
    async fn fetch(&self, channel: &ChannelId) -> Result<SessionCredential, CredentialError>;
}
