//! Workflow Engine Integration Tests
//!
//! Full runs through the façade: session validation, graceful degradation,
//! metrics assembly, and a media workflow wired with every collaborator.

use std::sync::Arc;

use serde_json::json;

use taskweave::services::executor::{ExecutorConfig, TodoExecutor};
use taskweave::services::todo::{BuildOptions, ItemDraft, TodoBuilder};
use taskweave::services::verification::VerificationEngine;
use taskweave::services::workflow::{WorkflowEngine, WorkflowOptions};
use taskweave::{ItemStatus, TodoMode};
use taskweave_core::{MemorySink, NullSink, ServiceContainer, Session};
use taskweave_tools::ToolProvider;

use crate::support::{media_provider, ScriptedLlm};

fn bare_engine() -> WorkflowEngine {
    WorkflowEngine::new(
        TodoBuilder::new(),
        TodoExecutor::new(None, VerificationEngine::new(), Arc::new(NullSink))
            .with_config(ExecutorConfig { backoff_base_ms: 0 }),
    )
}

#[tokio::test]
async fn test_null_session_fails_structurally() {
    let report = bare_engine()
        .execute("do a thing", None, WorkflowOptions::default())
        .await;

    assert!(!report.success);
    assert!(report.error.is_some());
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn test_blank_session_id_fails_structurally() {
    let session = Session::new("   ");
    let report = bare_engine()
        .execute("do a thing", Some(&session), WorkflowOptions::default())
        .await;

    assert!(!report.success);
    assert!(report
        .error
        .as_deref()
        .unwrap_or("")
        .contains("session id is empty"));
}

#[tokio::test]
async fn test_simple_request_end_to_end() {
    let session = Session::new("sess-wf");
    let report = bare_engine()
        .execute("Create feature X", Some(&session), WorkflowOptions::default())
        .await;

    assert!(report.success);
    let todo = report.todo.as_ref().unwrap();
    assert!(todo.complexity <= 3);
    assert_eq!(todo.mode, TodoMode::Standard);
    assert_eq!(todo.items[0].status, ItemStatus::Completed);
    assert_eq!(report.metrics.items_processed, 1);
    assert_eq!(report.metrics.items_failed, 0);
}

#[tokio::test]
async fn test_media_workflow_with_all_collaborators() {
    let provider: Arc<dyn ToolProvider> = Arc::new(media_provider());
    let llm = ScriptedLlm::new(&[
        // judge for the no-indicator search result, via adaptive fall-through
        r#"{"verified": true, "confidence": 85, "reason": "result listed"}"#,
    ]);
    let sink = Arc::new(MemorySink::new());

    let verification = VerificationEngine::auto(Some(provider.clone()), Some(llm.clone()));
    let engine = WorkflowEngine::new(
        TodoBuilder::new(),
        TodoExecutor::new(Some(provider), verification, sink.clone())
            .with_config(ExecutorConfig { backoff_base_ms: 0 }),
    );

    let container = Arc::new(ServiceContainer::new());
    let session = Session::new("sess-media").with_container(container);

    let mut play_params = serde_json::Map::new();
    play_params.insert("target".to_string(), json!("{{items.1.result.output.url}}"));

    let options = WorkflowOptions {
        build: BuildOptions {
            items: vec![
                ItemDraft::new("search for the launch video")
                    .with_mcp_servers(vec!["media".to_string()])
                    .with_tools_needed(vec!["search_videos".to_string()]),
                ItemDraft::new("play the launch video")
                    .with_mcp_servers(vec!["media".to_string()])
                    .with_tools_needed(vec!["play_video".to_string()])
                    .with_dependencies(vec![1])
                    .with_parameters(play_params.clone()),
            ],
            ..BuildOptions::default()
        },
        ..WorkflowOptions::default()
    };

    let report = engine
        .execute("watch the launch video", Some(&session), options)
        .await;

    assert!(report.success, "error: {:?}", report.error);
    let todo = report.todo.as_ref().unwrap();
    assert_eq!(todo.items[0].status, ItemStatus::Completed);
    assert_eq!(todo.items[1].status, ItemStatus::Completed);

    // The play item criteria got the playback clause from the action text
    assert!(todo.items[1].success_criteria.contains("Playback"));

    // The second item received the first item's output through the template
    let play_result = report.results[1].result.as_ref().unwrap();
    assert_eq!(
        play_result["output"]["playing"],
        "https://example.com/launch"
    );

    // Lifecycle events arrived in order for both items
    let events = sink.event_types();
    assert_eq!(
        events
            .iter()
            .filter(|event| event.as_str() == "task_completed")
            .count(),
        2
    );
    assert_eq!(events.last().map(String::as_str), Some("execution_completed"));

    assert_eq!(report.metrics.items_processed, 2);
    assert_eq!(report.metrics.total_attempts, 2);
}

#[tokio::test]
async fn test_cycle_in_drafts_fails_items_not_engine() {
    // A cyclic draft set cannot be ordered; in declared-order execution both
    // items find their dependency unmet and end skipped. The engine itself
    // still reports structured success with zero processed items.
    let session = Session::new("sess-cycle");
    let options = WorkflowOptions {
        build: BuildOptions {
            items: vec![
                ItemDraft::new("a").with_dependencies(vec![2]),
                ItemDraft::new("b").with_dependencies(vec![1]),
            ],
            ..BuildOptions::default()
        },
        ..WorkflowOptions::default()
    };

    let report = bare_engine()
        .execute("tangled request", Some(&session), options)
        .await;

    assert!(report.success);
    assert_eq!(report.metrics.items_processed, 0);
    let todo = report.todo.as_ref().unwrap();
    assert_eq!(todo.items[0].status, ItemStatus::Skipped);
    assert_eq!(todo.items[1].status, ItemStatus::Skipped);
}
