//! Verification Engine
//!
//! Thin selector exposing one `verify()` call to the executor. No logic of
//! its own: picks the best available verifier (adaptive > llm > mcp) and
//! degrades to a permissive default when none is configured.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use taskweave_core::Session;
use taskweave_llm::LlmClient;
use taskweave_tools::ToolProvider;

use crate::services::todo::types::WorkItem;
use crate::services::verification::adaptive::AdaptiveVerifier;
use crate::services::verification::confidence;
use crate::services::verification::llm::LlmVerifier;
use crate::services::verification::mcp::McpVerifier;
use crate::services::verification::types::{VerificationMethod, VerificationResult, Verifier};

/// Selector over the configured verifiers.
#[derive(Default)]
pub struct VerificationEngine {
    adaptive: Option<Arc<AdaptiveVerifier>>,
    llm: Option<Arc<LlmVerifier>>,
    mcp: Option<Arc<McpVerifier>>,
}

impl VerificationEngine {
    /// Engine with no verifiers: every check passes permissively.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the standard stack from the available collaborators: an MCP
    /// verifier when a provider exists, an LLM verifier when a client
    /// exists, and an adaptive layer whenever at least one is present.
    pub fn auto(
        provider: Option<Arc<dyn ToolProvider>>,
        client: Option<Arc<dyn LlmClient>>,
    ) -> Self {
        let mcp = provider
            .as_ref()
            .map(|provider| Arc::new(McpVerifier::new(Some(provider.clone()))));
        let llm = client
            .as_ref()
            .map(|client| Arc::new(LlmVerifier::new(Some(client.clone()))));

        let adaptive = if mcp.is_some() || llm.is_some() {
            Some(Arc::new(AdaptiveVerifier::new(mcp.clone(), llm.clone())))
        } else {
            None
        };

        Self { adaptive, llm, mcp }
    }

    pub fn with_adaptive(mut self, adaptive: Arc<AdaptiveVerifier>) -> Self {
        self.adaptive = Some(adaptive);
        self
    }

    pub fn with_llm(mut self, llm: Arc<LlmVerifier>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_mcp(mut self, mcp: Arc<McpVerifier>) -> Self {
        self.mcp = Some(mcp);
        self
    }

    /// Verify one execution result. Never fails: malfunctioning verifiers
    /// become low-confidence negatives, absence becomes a permissive pass.
    pub async fn verify(
        &self,
        item: &WorkItem,
        exec_result: Option<&Value>,
        session: &Session,
    ) -> VerificationResult {
        if let Some(adaptive) = &self.adaptive {
            return adaptive.verify(item, exec_result, session).await;
        }

        if let Some(llm) = &self.llm {
            return llm
                .verify(item, exec_result, session)
                .await
                .unwrap_or_else(|err| {
                    VerificationResult::from_verifier_error(err, VerificationMethod::Llm)
                });
        }

        if let Some(mcp) = &self.mcp {
            return mcp
                .verify(item, exec_result, session)
                .await
                .unwrap_or_else(|err| {
                    VerificationResult::from_verifier_error(err, VerificationMethod::Mcp)
                });
        }

        debug!(item = item.id, "no verifier configured, passing permissively");
        VerificationResult::pass(
            confidence::OPTIMISTIC_DEFAULT,
            "no verifier configured",
            VerificationMethod::Permissive,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
