//! Todo Executor
//!
//! The engine's central state machine. Items are processed strictly in
//! declared order with a per-item readiness check just before starting:
//!
//! ```text
//! pending --(dependencies unmet)--> skipped (terminal)
//! pending --(dependencies met)--> in_progress
//! in_progress --(plan, execute, verify all succeed)--> completed (terminal)
//! in_progress --(failure, attempt < max)--> in_progress (retry after backoff)
//! in_progress --(failure, attempt == max)--> failed (terminal)
//! ```
//!
//! Backoff between attempts is `backoff_base_ms * attempt` — linear. The
//! source this engine mirrors calls that schedule "exponential" in places;
//! the linear behavior is the observed one and is kept.
//!
//! Cancellation is checked at item boundaries only: an attempt that has
//! started runs to completion.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use taskweave_core::{NotificationSink, NullSink, Session, WorkflowEvent};
use taskweave_tools::ToolProvider;

use crate::services::dependency::DependencyResolver;
use crate::services::planner::tool_planner::{ToolPlan, ToolPlanner};
use crate::services::template::TemplateResolver;
use crate::services::todo::types::{ItemId, ItemStatus, Todo, WorkItem};
use crate::services::verification::{VerificationEngine, VerificationResult};
use crate::utils::error::{EngineError, EngineResult};
use crate::utils::ids;

// ============================================================================
// Configuration & Reports
// ============================================================================

/// Executor tuning knobs.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Base for the linear retry backoff (`base * attempt`)
    pub backoff_base_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            backoff_base_ms: 1000,
        }
    }
}

/// Outcome of one item's full retry cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReport {
    pub item_id: ItemId,
    pub status: ItemStatus,
    /// Attempts actually spent; 0 for skipped or unreached items
    pub attempts: u32,
    pub verification: Option<VerificationResult>,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Aggregate outcome of one executor run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub execution_id: String,
    /// Items that reached `completed`
    pub items_processed: usize,
    /// Items that reached `failed`
    pub items_failed: usize,
    /// Attempts spent across all items
    pub total_attempts: u32,
    pub cancelled: bool,
    /// One entry per item, in declared order
    pub items: Vec<ItemReport>,
}

// ============================================================================
// TodoExecutor
// ============================================================================

/// Runs one TODO's items through plan → execute → verify with bounded
/// retries. One TODO is executed by at most one call at a time; the
/// `execution` counters on the TODO are owned by that call.
pub struct TodoExecutor {
    planner: ToolPlanner,
    provider: Option<Arc<dyn ToolProvider>>,
    verification: VerificationEngine,
    sink: Arc<dyn NotificationSink>,
    templates: TemplateResolver,
    config: ExecutorConfig,
}

impl TodoExecutor {
    pub fn new(
        provider: Option<Arc<dyn ToolProvider>>,
        verification: VerificationEngine,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            planner: ToolPlanner::new(provider.clone()),
            provider,
            verification,
            sink,
            templates: TemplateResolver::new(),
            config: ExecutorConfig::default(),
        }
    }

    /// Executor with no collaborators: no tools, permissive verification.
    pub fn bare() -> Self {
        Self::new(None, VerificationEngine::new(), Arc::new(NullSink))
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Execute every item of the TODO in declared order.
    pub async fn execute(
        &self,
        todo: &mut Todo,
        session: &Session,
        cancel: &CancellationToken,
    ) -> ExecutionReport {
        let execution_id = ids::execution_id();
        let total = todo.items.len();
        let mut completed_ids: HashSet<ItemId> = HashSet::new();
        let mut results_context = json!({ "items": {} });
        let mut reports: Vec<ItemReport> = Vec::with_capacity(total);
        let mut cancelled = false;

        info!(execution = %execution_id, todo = %todo.id, items = total, "execution started");

        for index in 0..total {
            todo.execution.current_index = index;

            if cancel.is_cancelled() {
                cancelled = true;
                let pct = progress_pct(completed_ids.len(), total);
                self.sink
                    .notify(WorkflowEvent::execution_cancelled(&execution_id, pct));
                info!(execution = %execution_id, "execution cancelled at item boundary");
                break;
            }

            let item_id = todo.items[index].id;

            // Readiness gate: unmet, failed, or skipped dependencies all
            // surface here as "not every dependency is completed"
            if !DependencyResolver::can_execute(&todo.items[index], &completed_ids) {
                todo.items[index].status = ItemStatus::Skipped;
                let pct = progress_pct(completed_ids.len(), total);
                self.sink.notify(WorkflowEvent::task_skipped(
                    &execution_id,
                    item_id.to_string(),
                    pct,
                ));
                debug!(execution = %execution_id, item = item_id, "item skipped, dependencies not completed");
                reports.push(ItemReport {
                    item_id,
                    status: ItemStatus::Skipped,
                    attempts: 0,
                    verification: None,
                    result: None,
                    error: Some("dependencies not completed".to_string()),
                    duration_ms: 0,
                });
                continue;
            }

            let report = self
                .run_item(
                    todo,
                    index,
                    session,
                    &execution_id,
                    &mut completed_ids,
                    &mut results_context,
                    total,
                )
                .await;

            // Aggregate counters update only after the full retry cycle
            todo.execution.total_attempts += report.attempts;
            match report.status {
                ItemStatus::Completed => todo.execution.completed += 1,
                ItemStatus::Failed => todo.execution.failed += 1,
                _ => {}
            }
            reports.push(report);

            let pct = progress_pct(completed_ids.len(), total);
            self.sink
                .notify(WorkflowEvent::progress_update(&execution_id, pct));
        }

        // Items never reached (cancellation) stay pending in the report
        for item in todo.items.iter().skip(reports.len()) {
            reports.push(ItemReport {
                item_id: item.id,
                status: item.status,
                attempts: 0,
                verification: None,
                result: None,
                error: None,
                duration_ms: 0,
            });
        }

        if !cancelled {
            self.sink.notify(WorkflowEvent::execution_completed(
                &execution_id,
                progress_pct(completed_ids.len(), total),
            ));
        }

        info!(
            execution = %execution_id,
            completed = todo.execution.completed,
            failed = todo.execution.failed,
            attempts = todo.execution.total_attempts,
            cancelled,
            "execution finished"
        );

        ExecutionReport {
            execution_id,
            items_processed: todo.execution.completed,
            items_failed: todo.execution.failed,
            total_attempts: todo.execution.total_attempts,
            cancelled,
            items: reports,
        }
    }

    /// One item's full retry cycle.
    #[allow(clippy::too_many_arguments)]
    async fn run_item(
        &self,
        todo: &mut Todo,
        index: usize,
        session: &Session,
        execution_id: &str,
        completed_ids: &mut HashSet<ItemId>,
        results_context: &mut Value,
        total: usize,
    ) -> ItemReport {
        let item_id = todo.items[index].id;
        let max_attempts = todo.items[index].max_attempts;
        let started = Instant::now();

        todo.items[index].status = ItemStatus::InProgress;
        self.sink.notify(WorkflowEvent::task_started(
            execution_id,
            item_id.to_string(),
            progress_pct(completed_ids.len(), total),
        ));

        let mut last_verification: Option<VerificationResult> = None;
        let mut last_result: Option<Value> = None;
        let mut last_error: Option<String> = None;

        loop {
            let attempt = todo.items[index].attempt;

            let item_snapshot = todo.items[index].clone();
            let plan = self.planner.plan(&item_snapshot, session).await;

            match self.run_attempt(&item_snapshot, &plan, results_context).await {
                Ok(result_value) => {
                    let verification = self
                        .verification
                        .verify(&item_snapshot, Some(&result_value), session)
                        .await;

                    if verification.verified {
                        todo.items[index].status = ItemStatus::Completed;
                        completed_ids.insert(item_id);
                        record_result(results_context, item_id, &result_value);
                        last_result = Some(result_value);
                        last_verification = Some(verification);
                        last_error = None;
                        self.sink.notify(WorkflowEvent::task_completed(
                            execution_id,
                            item_id.to_string(),
                            progress_pct(completed_ids.len(), total),
                        ));
                        break;
                    }

                    debug!(
                        execution = %execution_id,
                        item = item_id,
                        attempt,
                        confidence = verification.confidence,
                        "verification rejected attempt"
                    );
                    last_error = Some(format!("verification failed: {}", verification.reason));
                    last_verification = Some(verification);
                    last_result = Some(result_value);
                }
                Err(err) => {
                    warn!(execution = %execution_id, item = item_id, attempt, error = %err, "attempt failed");
                    last_error = Some(err.to_string());
                }
            }

            if attempt >= max_attempts {
                todo.items[index].status = ItemStatus::Failed;
                self.sink.notify(WorkflowEvent::task_failed(
                    execution_id,
                    item_id.to_string(),
                    last_error.as_deref().unwrap_or("attempts exhausted"),
                    progress_pct(completed_ids.len(), total),
                ));
                break;
            }

            // Linear backoff; status stays in_progress through the wait
            let delay = self.config.backoff_base_ms * attempt as u64;
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            todo.items[index].attempt += 1;
        }

        ItemReport {
            item_id,
            status: todo.items[index].status,
            // The attempt counter stops at the attempt that terminated the
            // cycle, so it doubles as "attempts spent"
            attempts: todo.items[index].attempt,
            verification: last_verification,
            result: last_result,
            error: last_error,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// One attempt: resolve parameters, invoke the planned tools, shape the
    /// execution result. With no tools planned, produce the synthetic
    /// no-tool completion result.
    async fn run_attempt(
        &self,
        item: &WorkItem,
        plan: &ToolPlan,
        results_context: &Value,
    ) -> EngineResult<Value> {
        let params = self
            .templates
            .resolve_object(&item.parameters, results_context);

        let provider = match &self.provider {
            Some(provider) if !plan.tools.is_empty() => provider,
            _ => {
                return Ok(json!({
                    "completed": true,
                    "action": item.action,
                    "parameters": params,
                }));
            }
        };

        let mut outputs = Vec::with_capacity(plan.tools.len());
        for tool in &plan.tools {
            let output = provider
                .execute_tool(&tool.server, &tool.name, Value::Object(params.clone()))
                .await
                .map_err(|err| {
                    EngineError::tool_execution(format!("{}/{}: {err}", tool.server, tool.name))
                })?;
            outputs.push(json!({
                "server": tool.server,
                "tool": tool.name,
                "output": output,
            }));
        }

        if outputs.len() == 1 {
            Ok(outputs.into_iter().next().unwrap_or(Value::Null))
        } else {
            Ok(json!({ "results": outputs }))
        }
    }
}

/// Store an item's result where templates can reach it
/// (`{{items.<id>.result...}}`).
fn record_result(results_context: &mut Value, item_id: ItemId, result: &Value) {
    if let Some(items) = results_context
        .get_mut("items")
        .and_then(Value::as_object_mut)
    {
        items.insert(item_id.to_string(), json!({ "result": result }));
    }
}

fn progress_pct(completed: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        (completed as f64 / total as f64) * 100.0
    }
}

// ============================================================================
// Tests
// ============================================================================
