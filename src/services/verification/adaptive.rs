//! Adaptive Verifier
//!
//! Strategy selection and result aggregation over the MCP and LLM verifiers.
//!
//! Strategy is chosen from the shape of the execution result:
//! - provider-tagged results (`server`/`tool`/`mcp_result` keys) go MCP-first
//! - wide results (>5 keys) or long success criteria lean on the LLM
//! - everything else runs both and aggregates
//!
//! `McpFirst`/`LlmFirst` fall through to the secondary verifier when the
//! primary's confidence is at or below `FALLTHROUGH_THRESHOLD`. `Combined`
//! averages confidence and requires a strict majority of `verified` votes —
//! with exactly two verifiers that is AND-like on purpose.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use taskweave_core::Session;

use crate::services::todo::types::WorkItem;
use crate::services::verification::confidence;
use crate::services::verification::llm::LlmVerifier;
use crate::services::verification::mcp::McpVerifier;
use crate::services::verification::types::{VerificationMethod, VerificationResult, Verifier};

/// Success criteria longer than this route toward the LLM judge.
const LONG_CRITERIA_THRESHOLD: usize = 100;

/// Result keys that mark a provider-tagged execution result.
const PROVIDER_TAG_KEYS: [&str; 3] = ["server", "tool", "mcp_result"];

/// Results wider than this many keys route toward the LLM judge.
const WIDE_RESULT_KEYS: usize = 5;

/// Sub-strategy selected per verification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStrategy {
    McpFirst,
    LlmFirst,
    Combined,
}

/// Strategy-selection and aggregation layer over the two verifiers.
pub struct AdaptiveVerifier {
    mcp: Option<Arc<McpVerifier>>,
    llm: Option<Arc<LlmVerifier>>,
}

impl AdaptiveVerifier {
    pub fn new(mcp: Option<Arc<McpVerifier>>, llm: Option<Arc<LlmVerifier>>) -> Self {
        Self { mcp, llm }
    }

    /// Pick a sub-strategy from the result shape and criteria length.
    pub fn select_strategy(item: &WorkItem, exec_result: Option<&Value>) -> VerifyStrategy {
        if let Some(Value::Object(map)) = exec_result {
            if PROVIDER_TAG_KEYS.iter().any(|key| map.contains_key(*key)) {
                return VerifyStrategy::McpFirst;
            }
            if map.len() > WIDE_RESULT_KEYS {
                return VerifyStrategy::LlmFirst;
            }
        }
        if item.success_criteria.len() > LONG_CRITERIA_THRESHOLD {
            return VerifyStrategy::LlmFirst;
        }
        VerifyStrategy::Combined
    }

    /// Verify with the selected strategy. Infallible: malfunctioning
    /// verifiers are substituted with low-confidence negatives.
    pub async fn verify(
        &self,
        item: &WorkItem,
        exec_result: Option<&Value>,
        session: &Session,
    ) -> VerificationResult {
        let strategy = Self::select_strategy(item, exec_result);
        debug!(item = item.id, ?strategy, "adaptive verification");

        match strategy {
            VerifyStrategy::McpFirst => {
                self.primary_then_secondary(
                    self.mcp.as_deref().map(|v| v as &dyn Verifier),
                    self.llm.as_deref().map(|v| v as &dyn Verifier),
                    VerificationMethod::Mcp,
                    VerificationMethod::Llm,
                    item,
                    exec_result,
                    session,
                )
                .await
            }
            VerifyStrategy::LlmFirst => {
                self.primary_then_secondary(
                    self.llm.as_deref().map(|v| v as &dyn Verifier),
                    self.mcp.as_deref().map(|v| v as &dyn Verifier),
                    VerificationMethod::Llm,
                    VerificationMethod::Mcp,
                    item,
                    exec_result,
                    session,
                )
                .await
            }
            VerifyStrategy::Combined => self.combined(item, exec_result, session).await,
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn primary_then_secondary(
        &self,
        primary: Option<&dyn Verifier>,
        secondary: Option<&dyn Verifier>,
        primary_method: VerificationMethod,
        secondary_method: VerificationMethod,
        item: &WorkItem,
        exec_result: Option<&Value>,
        session: &Session,
    ) -> VerificationResult {
        let Some(primary) = primary else {
            return match secondary {
                Some(secondary) => {
                    run_checked(secondary, secondary_method, item, exec_result, session).await
                }
                None => permissive_default(),
            };
        };

        let result = run_checked(primary, primary_method, item, exec_result, session).await;
        if result.confidence <= confidence::FALLTHROUGH_THRESHOLD {
            if let Some(secondary) = secondary {
                debug!(
                    item = item.id,
                    confidence = result.confidence,
                    "primary verifier below threshold, consulting secondary"
                );
                return run_checked(secondary, secondary_method, item, exec_result, session).await;
            }
        }
        result
    }

    /// Run every available verifier and aggregate by majority vote.
    async fn combined(
        &self,
        item: &WorkItem,
        exec_result: Option<&Value>,
        session: &Session,
    ) -> VerificationResult {
        let mut results = Vec::new();
        if let Some(mcp) = &self.mcp {
            results.push(
                run_checked(
                    mcp.as_ref(),
                    VerificationMethod::Mcp,
                    item,
                    exec_result,
                    session,
                )
                .await,
            );
        }
        if let Some(llm) = &self.llm {
            results.push(
                run_checked(
                    llm.as_ref(),
                    VerificationMethod::Llm,
                    item,
                    exec_result,
                    session,
                )
                .await,
            );
        }

        match results.len() {
            0 => permissive_default(),
            1 => results.into_iter().next().unwrap_or_else(permissive_default),
            _ => aggregate(results),
        }
    }
}

/// Catch a malfunctioning verifier and substitute the standard fallback.
async fn run_checked(
    verifier: &dyn Verifier,
    method: VerificationMethod,
    item: &WorkItem,
    exec_result: Option<&Value>,
    session: &Session,
) -> VerificationResult {
    verifier
        .verify(item, exec_result, session)
        .await
        .unwrap_or_else(|err| VerificationResult::from_verifier_error(err, method))
}

/// Average confidence; verified requires a strict majority of votes.
fn aggregate(results: Vec<VerificationResult>) -> VerificationResult {
    let total = results.len();
    let verified_votes = results.iter().filter(|r| r.verified).count();
    let confidence_sum: u32 = results.iter().map(|r| r.confidence as u32).sum();
    let averaged = (confidence_sum / total as u32) as u8;
    let verified = verified_votes * 2 > total;

    let reasons: Vec<String> = results
        .iter()
        .map(|r| format!("{}: {}", r.method, r.reason))
        .collect();
    let details = json!({
        "votes": verified_votes,
        "total": total,
        "subResults": results,
    });

    let combined = if verified {
        VerificationResult::pass(averaged, reasons.join(" | "), VerificationMethod::Combined)
    } else {
        VerificationResult::fail(averaged, reasons.join(" | "), VerificationMethod::Combined)
    };
    combined.with_details(details)
}

fn permissive_default() -> VerificationResult {
    VerificationResult::pass(
        confidence::OPTIMISTIC_DEFAULT,
        "no verifier available",
        VerificationMethod::Permissive,
    )
}

// ============================================================================
// Tests
// ============================================================================
