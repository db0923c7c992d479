//! Chat with the assistant about the current dashboard data.

use crate::client::{ChatContext, ChatRequest, RequestClient, RequestError};
use crate::logging::{error_kind, query_preview};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by chat submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Query was empty or whitespace only; nothing was sent
    #[error("chat query is empty")]
    EmptyQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    /// Structured follow-up actions suggested by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Value>>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>, actions: Option<Vec<Value>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text: text.into(),
            actions,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text, None)
    }

    pub fn assistant(text: impl Into<String>, actions: Option<Vec<Value>>) -> Self {
        Self::new(Sender::Assistant, text, actions)
    }
}

/// Append-only chat transcript.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    enable_content_logging: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log truncated query previews.
    pub fn with_content_logging(mut self, enabled: bool) -> Self {
        self.enable_content_logging = enabled;
        self
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Submit a query and append the assistant's reply.
    ///
    /// The user message is appended before the call goes out. A failed call
    /// still yields an assistant message describing the failure; the only
    /// error is an empty query, which appends nothing and sends nothing.
    pub async fn submit(
        &mut self,
        client: &RequestClient,
        query: &str,
        context: ChatContext,
    ) -> Result<ChatMessage, ChatError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyQuery);
        }

        self.transcript.push(ChatMessage::user(query));

        tracing::info!(
            query_preview = query_preview(query, self.enable_content_logging).as_deref(),
            section = %context.active_section,
            "Submitting chat query"
        );

        let request = ChatRequest {
            query: query.to_string(),
            context,
        };

        let reply = match client.chat(&request).await {
            Ok(response) => {
                tracing::debug!(model = %response.model, cached = response.cached, "Chat reply received");
                ChatMessage::assistant(response.response, response.actions)
            }
            Err(e) => {
                tracing::warn!(error_kind = error_kind(&e), error = %e, "Chat query failed");
                ChatMessage::assistant(failure_text(&e), None)
            }
        };

        self.transcript.push(reply.clone());
        Ok(reply)
    }
}

fn failure_text(error: &RequestError) -> String {
    match error {
        RequestError::Timeout { .. } => {
            "The assistant took too long to respond. Please try again.".to_string()
        }
        RequestError::HttpStatus { code, .. } => {
            format!("The assistant is unavailable right now (HTTP {code}). Please try again later.")
        }
        RequestError::Transport { .. } => {
            "Could not reach the assistant. Check that the backend is running.".to_string()
        }
        RequestError::InvalidBody { .. } => {
            "The assistant sent a response that could not be read.".to_string()
        }
    }
}
