//! Verification Subsystem Integration Tests
//!
//! Degraded modes, adaptive routing, and aggregation over real verifier
//! instances with scripted collaborators.

use std::sync::Arc;

use serde_json::json;

use taskweave::services::todo::WorkItem;
use taskweave::services::verification::{
    confidence, AdaptiveVerifier, LlmVerifier, McpVerifier, VerificationEngine,
    VerificationMethod, Verifier,
};
use taskweave_core::Session;

use crate::support::ScriptedLlm;

fn item() -> WorkItem {
    WorkItem::new(1, "play the launch video").with_success_criteria("Video is playing")
}

fn session() -> Session {
    Session::new("sess-verify")
}

#[tokio::test]
async fn test_llm_verifier_without_client_is_optimistic() {
    let verifier = LlmVerifier::new(None);
    let result = verifier
        .verify(&item(), Some(&json!({"anything": 1})), &session())
        .await
        .unwrap();

    assert!(result.verified);
    assert_eq!(result.confidence, confidence::OPTIMISTIC_DEFAULT);
}

#[tokio::test]
async fn test_mcp_verifier_without_result_is_pessimistic() {
    let verifier = McpVerifier::new(None);
    let result = verifier.verify(&item(), None, &session()).await.unwrap();

    assert!(!result.verified);
    assert_eq!(result.confidence, 0);
}

#[tokio::test]
async fn test_split_vote_fails_the_combined_check() {
    // LLM says verified at 90; the MCP heuristic rejects an indicator-free
    // result at 25. One vote out of two is not a strict majority.
    let llm = LlmVerifier::new(Some(ScriptedLlm::new(&[
        r#"{"verified": true, "confidence": 90, "reason": "looks right"}"#,
    ])));
    let mcp = McpVerifier::new(None);
    let adaptive = AdaptiveVerifier::new(Some(Arc::new(mcp)), Some(Arc::new(llm)));

    let exec = json!({"output": "opaque"});
    let result = adaptive.verify(&item(), Some(&exec), &session()).await;

    assert_eq!(result.method, VerificationMethod::Combined);
    assert!(!result.verified, "1 of 2 votes must not verify");
    assert_eq!(
        result.confidence,
        (90 + confidence::MCP_HEURISTIC_NEGATIVE as u32) as u8 / 2
    );
}

#[tokio::test]
async fn test_unanimous_vote_passes_the_combined_check() {
    let llm = LlmVerifier::new(Some(ScriptedLlm::new(&[
        r#"{"verified": true, "confidence": 80, "reason": "playing"}"#,
    ])));
    let mcp = McpVerifier::new(None);
    let adaptive = AdaptiveVerifier::new(Some(Arc::new(mcp)), Some(Arc::new(llm)));

    let exec = json!({"success": true});
    let result = adaptive.verify(&item(), Some(&exec), &session()).await;

    assert!(result.verified);
    assert_eq!(result.method, VerificationMethod::Combined);
}

#[tokio::test]
async fn test_provider_tagged_result_falls_through_to_llm() {
    // MCP-first routing; the heuristic rejects at 25, which is below the
    // fall-through threshold, so the scripted LLM gets the final word.
    let llm = LlmVerifier::new(Some(ScriptedLlm::new(&[
        r#"{"verified": true, "confidence": 95, "reason": "confirmed on screen"}"#,
    ])));
    let adaptive = AdaptiveVerifier::new(
        Some(Arc::new(McpVerifier::new(None))),
        Some(Arc::new(llm)),
    );

    let exec = json!({"server": "media", "tool": "play_video", "output": {"bytes": ".."}});
    let result = adaptive.verify(&item(), Some(&exec), &session()).await;

    assert!(result.verified);
    assert_eq!(result.method, VerificationMethod::Llm);
    assert_eq!(result.confidence, 95);
}

#[tokio::test]
async fn test_malfunctioning_llm_becomes_low_confidence_negative() {
    // Script exhausted immediately: the LLM verifier errors, and the
    // combined pass substitutes the standard fallback instead of aborting.
    let llm = LlmVerifier::new(Some(ScriptedLlm::new(&[])));
    let adaptive = AdaptiveVerifier::new(
        Some(Arc::new(McpVerifier::new(None))),
        Some(Arc::new(llm)),
    );

    let exec = json!({"success": true});
    let result = adaptive.verify(&item(), Some(&exec), &session()).await;

    // MCP voted yes at 75, the broken LLM contributed a 10-confidence no
    assert!(!result.verified);
    assert_eq!(
        result.confidence,
        (confidence::MCP_HEURISTIC_POSITIVE as u32 + confidence::VERIFIER_ERROR as u32) as u8 / 2
    );
}

#[tokio::test]
async fn test_engine_selector_degrades_in_order() {
    let engine = VerificationEngine::new();
    let result = engine.verify(&item(), None, &session()).await;
    assert!(result.verified);
    assert_eq!(result.method, VerificationMethod::Permissive);

    let engine = VerificationEngine::new().with_llm(Arc::new(LlmVerifier::new(None)));
    let result = engine.verify(&item(), None, &session()).await;
    assert_eq!(result.method, VerificationMethod::Llm);
    assert_eq!(result.confidence, confidence::OPTIMISTIC_DEFAULT);
}
