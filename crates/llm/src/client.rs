//! LLM Client Trait
//!
//! Defines the common interface the engine expects from any LLM backend.

use async_trait::async_trait;

use crate::types::{LlmResponse, LlmResult, Message};

/// Trait every LLM backend must implement.
///
/// Backends only need `chat`; `analyze` is a convenience that wraps a single
/// prompt into a one-message conversation. The engine treats the absence of a
/// client as a degraded mode, never as a fatal error.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the client name for identification.
    fn name(&self) -> &str;

    /// Send a conversation and get a complete response.
    async fn chat(&self, messages: Vec<Message>) -> LlmResult<LlmResponse>;

    /// Analyze a single free-text prompt.
    async fn analyze(&self, prompt: &str) -> LlmResult<LlmResponse> {
        self.chat(vec![Message::user(prompt)]).await
    }
}
