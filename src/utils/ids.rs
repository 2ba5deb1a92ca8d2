//! Identifier Generation
//!
//! Collision-resistant prefixed identifiers for workflows, executions, and
//! contexts. UUID v4 keeps ids unique across concurrent runs without any
//! shared counter state.

use uuid::Uuid;

/// Id for one workflow invocation.
pub fn workflow_id() -> String {
    format!("wf-{}", Uuid::new_v4())
}

/// Id for one executor run.
pub fn execution_id() -> String {
    format!("exec-{}", Uuid::new_v4())
}

/// Id for one TODO aggregate.
pub fn todo_id() -> String {
    format!("todo-{}", Uuid::new_v4())
}

/// Id for one execution context.
pub fn context_id() -> String {
    format!("ctx-{}", Uuid::new_v4())
}
