//! Connection state and reconnect policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Connection state of the live channel.
///
/// `Failed` is terminal until the caller connects again; every other state is
/// transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
    Failed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Error => "error",
            ConnectionState::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capped linear backoff with a hard attempt ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_attempts: u32,
    pub max_multiplier: u32,
}

impl ReconnectPolicy {
    /// Delay before reconnect number `attempt` (1-based):
    /// `base_delay * min(attempt, max_multiplier)`, saturating at `Duration::MAX`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.min(self.max_multiplier))
    }

    /// Attempt number of the next reconnect, or None once the budget is spent.
    pub fn next_attempt(&self, attempts: u32) -> Option<u32> {
        if attempts < self.max_attempts {
            Some(attempts + 1)
        } else {
            None
        }
    }
}

impl From<&super::ChannelConfig> for ReconnectPolicy {
    fn from(config: &super::ChannelConfig) -> Self {
        Self {
            base_delay: config.reconnect_base_delay(),
            max_attempts: config.max_reconnect_attempts,
            max_multiplier: config.max_backoff_multiplier,
        }
    }
}
