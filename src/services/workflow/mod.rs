//! Workflow Façade
//!
//! Top-level entry point: validates the session, builds the TODO, runs the
//! executor, and assembles final metrics. Nothing escapes `execute()` as an
//! error — every failure becomes a structured report.

pub mod context;
pub mod engine;

pub use context::{ContextBuilder, ContextState, ExecutionContext};
pub use engine::{WorkflowEngine, WorkflowMetrics, WorkflowOptions, WorkflowReport};
