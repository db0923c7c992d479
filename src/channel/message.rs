//! JSON frames exchanged over the live channel

use super::ChannelError;
use crate::snapshot::{CostBreakdownUpdate, IncrementalUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `error` message pushed by the remote source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteErrorMessage {
    pub message: String,
    pub timestamp: Option<String>,
}

/// Decoded inbound frame, dispatched on its `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    FastInitialStatus(IncrementalUpdate),
    BackgroundUpdate(IncrementalUpdate),
    CostBreakdown(CostBreakdownUpdate),
    Error(RemoteErrorMessage),
    /// Any other type, forwarded with the raw payload intact
    Other { kind: String, payload: Value },
}

impl InboundMessage {
    /// Decode one text frame.
    pub fn parse(text: &str) -> Result<Self, ChannelError> {
        let payload: Value =
            serde_json::from_str(text).map_err(|e| ChannelError::Parse(e.to_string()))?;

        let kind = payload
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ChannelError::Parse("missing string `type` field".to_string()))?
            .to_string();

        let message = match kind.as_str() {
            "fast_initial_status" => InboundMessage::FastInitialStatus(decode(&kind, payload)?),
            "background_update" => InboundMessage::BackgroundUpdate(decode(&kind, payload)?),
            "cost_breakdown" => InboundMessage::CostBreakdown(decode(&kind, payload)?),
            "error" => InboundMessage::Error(decode(&kind, payload)?),
            _ => InboundMessage::Other { kind, payload },
        };
        Ok(message)
    }

    /// The frame's `type` discriminator
    pub fn kind(&self) -> &str {
        match self {
            InboundMessage::FastInitialStatus(_) => "fast_initial_status",
            InboundMessage::BackgroundUpdate(_) => "background_update",
            InboundMessage::CostBreakdown(_) => "cost_breakdown",
            InboundMessage::Error(_) => "error",
            InboundMessage::Other { kind, .. } => kind,
        }
    }

    /// Partial snapshot update carried by status frames
    pub fn as_update(&self) -> Option<&IncrementalUpdate> {
        match self {
            InboundMessage::FastInitialStatus(update) | InboundMessage::BackgroundUpdate(update) => {
                Some(update)
            }
            _ => None,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(kind: &str, payload: Value) -> Result<T, ChannelError> {
    serde_json::from_value(payload)
        .map_err(|e| ChannelError::Parse(format!("invalid `{}` payload: {}", kind, e)))
}

/// Outbound frame sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Ping { timestamp: String },
}

impl OutboundMessage {
    /// Heartbeat ping stamped with the current time
    pub fn ping() -> Self {
        OutboundMessage::Ping {
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> String {
        // Serializing a plain string-field enum cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}
