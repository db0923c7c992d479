//! Error types for the live channel.

use thiserror::Error;

/// Errors reported through the channel's error handlers.
///
/// None of these are fatal to the channel by themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// Socket could not be opened
    #[error("connect failed: {0}")]
    Connect(String),

    /// Transport-level error on an open socket
    #[error("transport error: {0}")]
    Transport(String),

    /// Inbound frame was not a valid message; it was dropped
    #[error("malformed frame: {0}")]
    Parse(String),

    /// The remote source sent an `error` message
    #[error("remote error: {0}")]
    Remote(String),

    /// Outbound frame could not be written
    #[error("send failed: {0}")]
    Send(String),
}
