//! Error types for request/response calls.

use thiserror::Error;

/// Errors that can occur during a request client call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Call exceeded its deadline and was aborted
    #[error("request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// Server answered with a non-2xx status
    #[error("request to {endpoint} failed with HTTP {code}")]
    HttpStatus { endpoint: String, code: u16 },

    /// DNS failure, connection refused, reset, TLS failure
    #[error("transport error calling {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// 2xx response whose body is not the expected JSON
    #[error("invalid response body from {endpoint}: {message}")]
    InvalidBody { endpoint: String, message: String },
}

/// Fieldless classification of a [`RequestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    Timeout,
    HttpStatus(u16),
    Transport,
    InvalidBody,
}

impl RequestError {
    pub fn kind(&self) -> RequestErrorKind {
        match self {
            RequestError::Timeout { .. } => RequestErrorKind::Timeout,
            RequestError::HttpStatus { code, .. } => RequestErrorKind::HttpStatus(*code),
            RequestError::Transport { .. } => RequestErrorKind::Transport,
            RequestError::InvalidBody { .. } => RequestErrorKind::InvalidBody,
        }
    }

    /// Endpoint path the failed call targeted
    pub fn endpoint(&self) -> &str {
        match self {
            RequestError::Timeout { endpoint, .. }
            | RequestError::HttpStatus { endpoint, .. }
            | RequestError::Transport { endpoint, .. }
            | RequestError::InvalidBody { endpoint, .. } => endpoint,
        }
    }

    /// Classify a reqwest error raised while sending or reading a call.
    pub(crate) fn from_reqwest(endpoint: &str, timeout_ms: u64, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RequestError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_ms,
            }
        } else if error.is_decode() {
            RequestError::InvalidBody {
                endpoint: endpoint.to_string(),
                message: error.to_string(),
            }
        } else {
            RequestError::Transport {
                endpoint: endpoint.to_string(),
                message: error.to_string(),
            }
        }
    }
}
