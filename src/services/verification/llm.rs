//! LLM Verifier
//!
//! Asks an LLM to judge whether an execution result satisfies the item's
//! natural-language success criteria. Expects a JSON judgment
//! `{verified, confidence, reason}`; falls back to keyword scanning when the
//! response isn't parseable JSON.
//!
//! Missing LLM client is a documented degraded mode: `verified: true` at
//! `OPTIMISTIC_DEFAULT` confidence, so workflows keep moving without a
//! judge rather than deadlocking on one.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use taskweave_core::Session;
use taskweave_llm::{extract_json_value, LlmClient};

use crate::services::todo::types::WorkItem;
use crate::services::verification::confidence;
use crate::services::verification::types::{VerificationMethod, VerificationResult, Verifier};
use crate::utils::error::{EngineError, EngineResult};

/// Stringified execution results are cut to this many characters.
const RESULT_TRUNCATION: usize = 500;

/// Keywords the fallback scan treats as a positive judgment.
const POSITIVE_KEYWORDS: [&str; 4] = ["success", "completed", "verified", "yes"];

/// LLM-judgment based verifier.
pub struct LlmVerifier {
    client: Option<Arc<dyn LlmClient>>,
}

impl LlmVerifier {
    pub fn new(client: Option<Arc<dyn LlmClient>>) -> Self {
        Self { client }
    }

    fn build_prompt(item: &WorkItem, exec_result: Option<&Value>) -> String {
        let result_text = match exec_result {
            Some(value) => {
                let text = value.to_string();
                text.chars().take(RESULT_TRUNCATION).collect()
            }
            None => "null".to_string(),
        };

        format!(
            "Judge whether this task outcome satisfies its success criteria.\n\n\
             Task: {}\n\
             Success criteria: {}\n\
             Execution result: {}\n\n\
             Respond with ONLY valid JSON:\n\
             {{\"verified\": true|false, \"confidence\": 0-100, \"reason\": \"brief explanation\"}}",
            item.action, item.success_criteria, result_text
        )
    }

    fn parse_judgment(text: &str) -> Option<VerificationResult> {
        let value = extract_json_value(text).ok()?;
        let verified = value.get("verified")?.as_bool()?;
        let judged_confidence = value
            .get("confidence")
            .and_then(Value::as_u64)
            .map(|c| c.min(100) as u8)
            .unwrap_or(confidence::OPTIMISTIC_DEFAULT);
        let reason = value
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("LLM judgment")
            .to_string();

        let result = if verified {
            VerificationResult::pass(judged_confidence, reason, VerificationMethod::Llm)
        } else {
            VerificationResult::fail(judged_confidence, reason, VerificationMethod::Llm)
        };
        Some(result.with_details(value))
    }

    fn keyword_fallback(text: &str) -> VerificationResult {
        let lowered = text.to_lowercase();
        let positive = POSITIVE_KEYWORDS
            .iter()
            .any(|keyword| lowered.contains(keyword));

        if positive {
            VerificationResult::pass(
                confidence::LLM_KEYWORD_POSITIVE,
                "response contains positive keywords",
                VerificationMethod::Llm,
            )
        } else {
            VerificationResult::fail(
                confidence::LLM_KEYWORD_NEGATIVE,
                "response contains no positive keywords",
                VerificationMethod::Llm,
            )
        }
    }
}

#[async_trait]
impl Verifier for LlmVerifier {
    async fn verify(
        &self,
        item: &WorkItem,
        exec_result: Option<&Value>,
        _session: &Session,
    ) -> EngineResult<VerificationResult> {
        let Some(client) = &self.client else {
            return Ok(VerificationResult::pass(
                confidence::OPTIMISTIC_DEFAULT,
                "no LLM client configured, optimistic default",
                VerificationMethod::Llm,
            ));
        };

        let prompt = Self::build_prompt(item, exec_result);
        let response = client
            .analyze(&prompt)
            .await
            .map_err(|e| EngineError::verification(format!("LLM judge call failed: {e}")))?;
        let text = response.text_content().unwrap_or_default();

        if let Some(result) = Self::parse_judgment(text) {
            debug!(item = item.id, verified = result.verified, "LLM judgment parsed");
            return Ok(result);
        }

        debug!(item = item.id, "LLM judgment unparseable, using keyword fallback");
        Ok(Self::keyword_fallback(text))
    }
}

// ============================================================================
// Tests
// ============================================================================
