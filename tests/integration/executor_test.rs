//! Todo Executor Integration Tests
//!
//! The retry/verify state machine end-to-end: attempt budgets, skip
//! cascades, output chaining, and cancellation, driven through the
//! in-memory tool provider and scripted verification.

use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use taskweave::services::executor::{ExecutorConfig, TodoExecutor};
use taskweave::services::todo::{BuildOptions, ItemDraft, TodoBuilder};
use taskweave::services::verification::{LlmVerifier, McpVerifier, VerificationEngine};
use taskweave::ItemStatus;
use taskweave_core::{MemorySink, NullSink, Session};

use crate::support::{media_provider, ScriptedLlm};

fn fast() -> ExecutorConfig {
    ExecutorConfig { backoff_base_ms: 0 }
}

fn session() -> Session {
    Session::new("sess-exec")
}

async fn build_todo(drafts: Vec<ItemDraft>) -> taskweave::Todo {
    TodoBuilder::new()
        .build(
            "run the planned items",
            &BuildOptions {
                items: drafts,
                ..BuildOptions::default()
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_attempt_budget_is_exact() {
    // Every attempt produces the synthetic no-tool result, which the MCP
    // heuristic rejects; two attempts, then terminal failure.
    let verification = VerificationEngine::new().with_mcp(Arc::new(McpVerifier::new(None)));
    let executor =
        TodoExecutor::new(None, verification, Arc::new(NullSink)).with_config(fast());

    let mut todo = build_todo(vec![ItemDraft::new("unverifiable work")]).await;
    todo.items[0].max_attempts = 2;

    let report = executor
        .execute(&mut todo, &session(), &CancellationToken::new())
        .await;

    assert_eq!(report.items[0].status, ItemStatus::Failed);
    assert_eq!(report.items[0].attempts, 2);
    assert_eq!(report.total_attempts, 2);
    assert_eq!(todo.items[0].attempt, 2, "attempt never exceeds the budget");
}

#[tokio::test]
async fn test_verification_rejection_then_acceptance() {
    // Provider-tagged results route MCP-first and the opaque screenshot
    // fails the heuristic, falling through to the scripted LLM judge:
    // rejected on attempt one, accepted on attempt two.
    let llm = LlmVerifier::new(Some(ScriptedLlm::new(&[
        r#"{"verified": false, "confidence": 30, "reason": "screen still blank"}"#,
        r#"{"verified": true, "confidence": 90, "reason": "video visible"}"#,
    ])));
    let verification = VerificationEngine::new()
        .with_adaptive(Arc::new(taskweave::services::verification::AdaptiveVerifier::new(
            Some(Arc::new(McpVerifier::new(None))),
            Some(Arc::new(llm)),
        )));
    let executor = TodoExecutor::new(
        Some(Arc::new(media_provider())),
        verification,
        Arc::new(NullSink),
    )
    .with_config(fast());

    let mut todo = build_todo(vec![
        ItemDraft::new("capture the screen").with_tools_needed(vec!["screenshot".to_string()])
    ])
    .await;

    let report = executor
        .execute(&mut todo, &session(), &CancellationToken::new())
        .await;

    assert_eq!(report.items[0].status, ItemStatus::Completed);
    assert_eq!(report.items[0].attempts, 2);
    let verification = report.items[0].verification.as_ref().unwrap();
    assert!(verification.verified);
    assert_eq!(verification.confidence, 90);
}

#[tokio::test]
async fn test_skip_cascade_through_failed_dependency() {
    let verification = VerificationEngine::new().with_mcp(Arc::new(McpVerifier::new(None)));
    let executor =
        TodoExecutor::new(None, verification, Arc::new(NullSink)).with_config(fast());

    let mut todo = build_todo(vec![
        ItemDraft::new("doomed"),
        ItemDraft::new("blocked directly").with_dependencies(vec![1]),
        ItemDraft::new("blocked transitively").with_dependencies(vec![2]),
        ItemDraft::new("independent"),
    ])
    .await;
    todo.items[0].max_attempts = 1;
    todo.items[3].max_attempts = 1;

    let report = executor
        .execute(&mut todo, &session(), &CancellationToken::new())
        .await;

    assert_eq!(todo.items[0].status, ItemStatus::Failed);
    assert_eq!(todo.items[1].status, ItemStatus::Skipped);
    assert_eq!(todo.items[2].status, ItemStatus::Skipped);
    assert_eq!(report.items[1].attempts, 0, "skipped items are never attempted");
    // The independent item is unaffected by the cascade: it still runs
    // (and fails on its own terms under this verification engine)
    assert_eq!(report.items[3].status, ItemStatus::Failed);
    assert_eq!(report.items[3].attempts, 1);
}

#[tokio::test]
async fn test_chained_parameters_resolve_previous_output() {
    let executor = TodoExecutor::new(
        Some(Arc::new(media_provider())),
        VerificationEngine::new(),
        Arc::new(NullSink),
    )
    .with_config(fast());

    let mut play_params = serde_json::Map::new();
    play_params.insert("target".to_string(), json!("{{items.1.result.output.url}}"));

    let mut todo = build_todo(vec![
        ItemDraft::new("search for the launch video")
            .with_tools_needed(vec!["search_videos".to_string()]),
        ItemDraft::new("play the found video")
            .with_tools_needed(vec!["play_video".to_string()])
            .with_dependencies(vec![1]),
    ])
    .await;
    todo.items[1].parameters = play_params;

    let report = executor
        .execute(&mut todo, &session(), &CancellationToken::new())
        .await;

    assert_eq!(report.items_processed, 2);
    let play_result = report.items[1].result.as_ref().unwrap();
    assert_eq!(
        play_result["output"]["playing"],
        "https://example.com/launch"
    );
}

#[tokio::test]
async fn test_cancellation_checked_at_item_boundaries_only() {
    let sink = Arc::new(MemorySink::new());
    let executor = TodoExecutor::new(
        Some(Arc::new(media_provider())),
        VerificationEngine::new(),
        sink.clone(),
    )
    .with_config(fast());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut todo = build_todo(vec![ItemDraft::new("never starts")]).await;
    let report = executor.execute(&mut todo, &session(), &cancel).await;

    assert!(report.cancelled);
    assert_eq!(todo.items[0].status, ItemStatus::Pending);
    assert_eq!(sink.event_types(), vec!["execution_cancelled"]);
}

#[tokio::test]
async fn test_wide_hint_free_item_uses_full_pool() {
    // No server or tool hints: the item plans against every provider tool.
    // All three run; the aggregate result carries each invocation.
    let executor = TodoExecutor::new(
        Some(Arc::new(media_provider())),
        VerificationEngine::new(),
        Arc::new(NullSink),
    )
    .with_config(fast());

    let mut todo = build_todo(vec![ItemDraft::new("poke everything")]).await;
    let report = executor
        .execute(&mut todo, &session(), &CancellationToken::new())
        .await;

    assert_eq!(report.items_processed, 1);
    let result = report.items[0].result.as_ref().unwrap();
    assert_eq!(result["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_item_without_any_tools_still_completes() {
    let executor = TodoExecutor::bare().with_config(fast());
    let mut todo = build_todo(vec![ItemDraft::new("pure reasoning step")]).await;

    let report = executor
        .execute(&mut todo, &session(), &CancellationToken::new())
        .await;

    assert_eq!(report.items_processed, 1);
    let result = report.items[0].result.as_ref().unwrap();
    assert_eq!(result["completed"], true);
}
