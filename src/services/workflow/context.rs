//! Execution Context
//!
//! Per-run bag of state: identifiers, the current TODO/item, accumulated
//! results, a state tag, and handles to the notification sink and the
//! session's DI container. Created at the start of a workflow run by the
//! `ContextBuilder`, owned by that run alone, discarded at the end.

use std::sync::Arc;

use serde_json::Value;

use taskweave_core::{NotificationSink, NullSink, ServiceContainer, Session};

use crate::services::todo::types::ItemId;
use crate::utils::ids;

/// Lifecycle tag for one workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Created,
    Building,
    Executing,
    Completed,
    Failed,
    Cancelled,
}

/// Single-owner state bag for one workflow run.
pub struct ExecutionContext {
    pub id: String,
    pub session_id: String,
    pub todo_id: Option<String>,
    pub current_item: Option<ItemId>,
    pub state: ContextState,
    /// Item results in completion order
    pub results: Vec<Value>,
    pub created_at: String,
    pub updated_at: String,
    /// Observational sink handle
    pub sink: Arc<dyn NotificationSink>,
    /// DI handle carried over from the session, if any
    pub container: Option<Arc<ServiceContainer>>,
}

impl ExecutionContext {
    /// Advance the lifecycle state, stamping `updated_at`.
    pub fn advance(&mut self, state: ContextState) {
        self.state = state;
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    pub fn set_todo(&mut self, todo_id: impl Into<String>) {
        self.todo_id = Some(todo_id.into());
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    pub fn push_result(&mut self, result: Value) {
        self.results.push(result);
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Builds `ExecutionContext` instances for workflow runs.
pub struct ContextBuilder {
    session_id: String,
    container: Option<Arc<ServiceContainer>>,
    sink: Arc<dyn NotificationSink>,
}

impl ContextBuilder {
    pub fn new(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            container: session.container.clone(),
            sink: Arc::new(NullSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn build(self) -> ExecutionContext {
        let now = chrono::Utc::now().to_rfc3339();
        ExecutionContext {
            id: ids::context_id(),
            session_id: self.session_id,
            todo_id: None,
            current_item: None,
            state: ContextState::Created,
            results: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
            sink: self.sink,
            container: self.container,
        }
    }
}
