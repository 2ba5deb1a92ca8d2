//! LLM Types
//!
//! Message and response types for the LLM collaborator boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn text(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(MessageRole::Assistant, content)
    }
}

/// Complete response from an LLM client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    /// Text content. `None` when the model produced no text.
    pub content: Option<String>,
    /// Model identifier reported by the client.
    pub model: String,
    /// Provider-specific stop reason, if any.
    pub stop_reason: Option<String>,
}

impl LlmResponse {
    /// Build a plain text response.
    pub fn text(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            model: model.into(),
            stop_reason: None,
        }
    }

    /// Non-empty trimmed text content, if present.
    pub fn text_content(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Errors an LLM client may surface.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The request could not be completed (network, provider, quota).
    #[error("LLM request failed: {message}")]
    RequestFailed { message: String },

    /// The client responded but the payload was unusable.
    #[error("LLM response invalid: {message}")]
    InvalidResponse { message: String },

    /// The response carried no text at all.
    #[error("LLM response empty (model: {model})")]
    EmptyResponse { model: String },
}

impl LlmError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

/// Result type alias for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;
