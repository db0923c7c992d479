//! Configuration for the request client.

use serde::{Deserialize, Serialize};

/// Configuration for request/response calls against the API origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Deadline for a single call, body included
    pub request_timeout_seconds: u64,
    /// Namespace used when a caller does not name one
    pub default_namespace: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            request_timeout_seconds: 10,
            default_namespace: "default".to_string(),
        }
    }
}
