use crate::config::Config;
use crate::credential::ChannelId;
use serde::{Deserialize, Serialize};

/// Configuration for a single call session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Channel to join (e.g., "team-standup")
    pub channel: ChannelId,

    /// Application identifier sent with every transport join
    pub app_id: String,
}

impl SessionConfig {
    pub fn new(channel: impl Into<ChannelId>, app_id: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            app_id: app_id.into(),
        }
    }

    pub fn from_config(config: &Config, channel: impl Into<ChannelId>) -> Self {
        Self::new(channel, config.transport.app_id.clone())
    }
}
