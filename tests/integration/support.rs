//! Shared Test Support
//!
//! Scripted collaborators used across the integration suites.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use taskweave_llm::{LlmClient, LlmError, LlmResponse, LlmResult, Message};
use taskweave_tools::{FnTool, InMemoryToolProvider};

/// LLM client that replays a fixed list of responses in order.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedLlm {
    pub fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
        })
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, _messages: Vec<Message>) -> LlmResult<LlmResponse> {
        let next = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        match next {
            Some(text) => Ok(LlmResponse::text("scripted-model", text)),
            None => Err(LlmError::request("script exhausted")),
        }
    }
}

/// Media-flavored provider: a search tool, a play tool that reports a
/// successful status, and an opaque tool with no success indicator.
pub fn media_provider() -> InMemoryToolProvider {
    let mut provider = InMemoryToolProvider::new();
    provider.register(Arc::new(FnTool::new(
        "media",
        "search_videos",
        "finds a video by query",
        json!({"type": "object"}),
        |_| Ok(json!({"url": "https://example.com/launch", "title": "Launch"})),
    )));
    provider.register(Arc::new(FnTool::new(
        "media",
        "play_video",
        "starts playback and reports status",
        json!({"type": "object"}),
        |params| Ok(json!({"status": "completed", "playing": params.get("target")})),
    )));
    provider.register(Arc::new(FnTool::new(
        "media",
        "screenshot",
        "returns opaque data",
        json!({"type": "object"}),
        |_| Ok(json!({"bytes": "..."})),
    )));
    provider
}
