//! Workflow Engine
//!
//! Top-level façade: validate the session, build the TODO, execute it,
//! assemble metrics. Every failure path yields a structured report with
//! `success: false` and an `error` string — no error ever escapes
//! `execute()`.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use taskweave_core::Session;

use crate::services::executor::{ItemReport, TodoExecutor};
use crate::services::todo::builder::{BuildOptions, TodoBuilder};
use crate::services::todo::types::Todo;
use crate::services::workflow::context::{ContextBuilder, ContextState};
use crate::utils::ids;

/// Aggregate timing and outcome counters for one workflow run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetrics {
    pub duration_ms: u64,
    pub items_processed: usize,
    pub items_failed: usize,
    pub total_attempts: u32,
}

/// Final report of one workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowReport {
    pub success: bool,
    pub workflow_id: String,
    pub todo: Option<Todo>,
    /// Per-item outcomes in declared order
    pub results: Vec<ItemReport>,
    pub metrics: WorkflowMetrics,
    pub error: Option<String>,
}

/// Options for one workflow invocation.
#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    pub build: BuildOptions,
    /// Checked at item boundaries by the executor
    pub cancellation: CancellationToken,
}

/// Validates, builds, executes, reports.
pub struct WorkflowEngine {
    builder: TodoBuilder,
    executor: TodoExecutor,
}

impl WorkflowEngine {
    pub fn new(builder: TodoBuilder, executor: TodoExecutor) -> Self {
        Self { builder, executor }
    }

    /// Run one workflow end to end. Never returns an error.
    pub async fn execute(
        &self,
        user_message: &str,
        session: Option<&Session>,
        options: WorkflowOptions,
    ) -> WorkflowReport {
        let started = Instant::now();
        let workflow_id = ids::workflow_id();

        // Precondition checks before doing anything
        let Some(session) = session else {
            return failure(workflow_id, started, "session is required");
        };
        if let Err(err) = session.validate() {
            return failure(workflow_id, started, err.to_string());
        }
        if session.container.is_none() {
            warn!(session = %session.id, "session has no DI container; continuing without one");
        }

        info!(workflow = %workflow_id, session = %session.id, "workflow started");
        let mut context = ContextBuilder::new(session).build();

        context.advance(ContextState::Building);
        let mut todo = match self.builder.build(user_message, &options.build).await {
            Ok(todo) => todo,
            Err(err) => {
                context.advance(ContextState::Failed);
                return failure(workflow_id, started, err.to_string());
            }
        };
        context.set_todo(todo.id.clone());

        context.advance(ContextState::Executing);
        let report = self
            .executor
            .execute(&mut todo, session, &options.cancellation)
            .await;

        for item in &report.items {
            if let Some(result) = &item.result {
                context.push_result(result.clone());
            }
        }
        context.advance(if report.cancelled {
            ContextState::Cancelled
        } else {
            ContextState::Completed
        });

        let metrics = WorkflowMetrics {
            duration_ms: started.elapsed().as_millis() as u64,
            items_processed: report.items_processed,
            items_failed: report.items_failed,
            total_attempts: report.total_attempts,
        };

        info!(
            workflow = %workflow_id,
            duration_ms = metrics.duration_ms,
            processed = metrics.items_processed,
            failed = metrics.items_failed,
            "workflow finished"
        );

        WorkflowReport {
            success: true,
            workflow_id,
            todo: Some(todo),
            results: report.items,
            metrics,
            error: None,
        }
    }
}

fn failure(workflow_id: String, started: Instant, error: impl Into<String>) -> WorkflowReport {
    let error = error.into();
    warn!(workflow = %workflow_id, %error, "workflow aborted");
    WorkflowReport {
        success: false,
        workflow_id,
        todo: None,
        results: Vec::new(),
        metrics: WorkflowMetrics {
            duration_ms: started.elapsed().as_millis() as u64,
            ..WorkflowMetrics::default()
        },
        error: Some(error),
    }
}

// ============================================================================
// Tests
// ============================================================================
