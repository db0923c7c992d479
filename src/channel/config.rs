//! Configuration for the live channel.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest heartbeat interval the channel will schedule (one day).
pub const MAX_HEARTBEAT_INTERVAL_SECONDS: u64 = 86_400;

/// Longest reconnect base delay the channel will schedule (one hour).
pub const MAX_RECONNECT_BASE_DELAY_MS: u64 = 3_600_000;

/// Configuration for the duplex push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// WebSocket endpoint URL
    pub url: String,
    /// Seconds between heartbeat pings while connected
    pub heartbeat_interval_seconds: u64,
    /// Base delay of the capped linear backoff
    pub reconnect_base_delay_ms: u64,
    /// Reconnects attempted before giving up
    pub max_reconnect_attempts: u32,
    /// Cap on the backoff multiplier
    pub max_backoff_multiplier: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8000/ws".to_string(),
            heartbeat_interval_seconds: 30,
            reconnect_base_delay_ms: 1000,
            max_reconnect_attempts: 10,
            max_backoff_multiplier: 5,
        }
    }
}

impl ChannelConfig {
    /// Heartbeat period, clamped to 1s..=[`MAX_HEARTBEAT_INTERVAL_SECONDS`]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_seconds.clamp(1, MAX_HEARTBEAT_INTERVAL_SECONDS))
    }

    /// Backoff base delay, clamped to [`MAX_RECONNECT_BASE_DELAY_MS`]
    pub fn reconnect_base_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_base_delay_ms.min(MAX_RECONNECT_BASE_DELAY_MS))
    }
}
