//! Notification Sink & Workflow Events
//!
//! Progress events emitted during workflow execution. The sink is purely
//! observational: engine correctness never depends on a sink succeeding, so
//! the trait is infallible and implementations swallow their own errors.

use serde::{Deserialize, Serialize};

/// Progress event payload emitted while a workflow executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEvent {
    /// Execution this event belongs to
    pub execution_id: String,
    /// Event type tag
    pub event_type: String,
    /// Item the event relates to (if any)
    pub item_id: Option<String>,
    /// Item status at emission time
    pub status: Option<String>,
    /// Error message (if any)
    pub error: Option<String>,
    /// Overall progress percentage (0-100)
    pub progress_pct: f64,
}

impl WorkflowEvent {
    pub fn task_started(execution_id: &str, item_id: impl Into<String>, progress_pct: f64) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            event_type: "task_started".to_string(),
            item_id: Some(item_id.into()),
            status: Some("in_progress".to_string()),
            error: None,
            progress_pct,
        }
    }

    pub fn task_completed(
        execution_id: &str,
        item_id: impl Into<String>,
        progress_pct: f64,
    ) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            event_type: "task_completed".to_string(),
            item_id: Some(item_id.into()),
            status: Some("completed".to_string()),
            error: None,
            progress_pct,
        }
    }

    pub fn task_failed(
        execution_id: &str,
        item_id: impl Into<String>,
        error: &str,
        progress_pct: f64,
    ) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            event_type: "task_failed".to_string(),
            item_id: Some(item_id.into()),
            status: Some("failed".to_string()),
            error: Some(error.to_string()),
            progress_pct,
        }
    }

    pub fn task_skipped(execution_id: &str, item_id: impl Into<String>, progress_pct: f64) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            event_type: "task_skipped".to_string(),
            item_id: Some(item_id.into()),
            status: Some("skipped".to_string()),
            error: None,
            progress_pct,
        }
    }

    pub fn progress_update(execution_id: &str, progress_pct: f64) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            event_type: "progress_update".to_string(),
            item_id: None,
            status: None,
            error: None,
            progress_pct,
        }
    }

    pub fn execution_completed(execution_id: &str, progress_pct: f64) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            event_type: "execution_completed".to_string(),
            item_id: None,
            status: None,
            error: None,
            progress_pct,
        }
    }

    pub fn execution_cancelled(execution_id: &str, progress_pct: f64) -> Self {
        Self {
            execution_id: execution_id.to_string(),
            event_type: "execution_cancelled".to_string(),
            item_id: None,
            status: None,
            error: None,
            progress_pct,
        }
    }
}

/// Observer for workflow progress.
///
/// Implementations must not block the caller for long and must not panic;
/// delivery failures are their own problem to report.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: WorkflowEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: WorkflowEvent) {}
}

/// Sink that records events in memory. Intended for tests and debugging.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: std::sync::Mutex<Vec<WorkflowEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event received so far.
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Event type tags in arrival order.
    pub fn event_types(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.event_type)
            .collect()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, event: WorkflowEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
