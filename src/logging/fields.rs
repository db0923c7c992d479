//! Field helpers for structured logging

use crate::client::{RequestError, RequestErrorKind};

const QUERY_PREVIEW_CHARS: usize = 100;
const FRAME_PREVIEW_CHARS: usize = 200;

/// Short label for the `error_kind` field of a failed request
///
/// # Examples
///
/// ```
/// use finkube::client::RequestError;
/// use finkube::logging::error_kind;
///
/// let err = RequestError::HttpStatus { endpoint: "/health".to_string(), code: 503 };
/// assert_eq!(error_kind(&err), "http_status");
/// ```
pub fn error_kind(error: &RequestError) -> &'static str {
    match error.kind() {
        RequestErrorKind::Timeout => "timeout",
        RequestErrorKind::HttpStatus(_) => "http_status",
        RequestErrorKind::Transport => "transport",
        RequestErrorKind::InvalidBody => "invalid_body",
    }
}

/// Truncated chat query for logging, only when content logging is enabled
///
/// Returns None for empty queries and when content logging is off.
pub fn query_preview(query: &str, enable_content_logging: bool) -> Option<String> {
    if !enable_content_logging {
        return None;
    }
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_string(trimmed, QUERY_PREVIEW_CHARS))
}

/// Truncated raw frame text attached to parse-failure warnings
pub fn frame_preview(frame: &str) -> String {
    truncate_string(frame, FRAME_PREVIEW_CHARS)
}

fn truncate_string(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_preview_disabled() {
        assert!(query_preview("scale the api", false).is_none());
    }

    #[test]
    fn test_query_preview_truncates() {
        let query = "x".repeat(250);
        let preview = query_preview(&query, true).unwrap();
        assert_eq!(preview.len(), QUERY_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_query_preview_blank_is_none() {
        assert!(query_preview("   ", true).is_none());
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let text = "₹".repeat(300);
        let preview = frame_preview(&text);
        assert_eq!(preview.chars().count(), FRAME_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_error_kind_labels() {
        let timeout = RequestError::Timeout {
            endpoint: "/finops/overview".to_string(),
            timeout_ms: 10_000,
        };
        let transport = RequestError::Transport {
            endpoint: "/health".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(error_kind(&timeout), "timeout");
        assert_eq!(error_kind(&transport), "transport");
    }
}
