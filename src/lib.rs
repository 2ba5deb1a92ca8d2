//! Taskweave - Adaptive TODO Workflow Engine
//!
//! Turns a free-form user request into a TODO of dependency-ordered work
//! items, plans tool invocations for each item against a pluggable tool
//! provider, executes them, verifies outcomes through a multi-strategy
//! verification subsystem, and retries failures with linear backoff.
//!
//! The engine consumes four collaborators at their interface boundary:
//! a tool provider (`taskweave_tools::ToolProvider`), an LLM client
//! (`taskweave_llm::LlmClient`), a session with an optional DI container
//! (`taskweave_core::Session`), and a notification sink
//! (`taskweave_core::NotificationSink`).

pub mod services;
pub mod utils;

// Re-export the façade and the pieces hosts wire together
pub use services::dependency::{DependencyResolver, Resolution};
pub use services::executor::{ExecutionReport, ExecutorConfig, TodoExecutor};
pub use services::planner::{AdaptivePlanner, PlanStrategy, ToolPlanner};
pub use services::todo::{ItemStatus, Todo, TodoBuilder, TodoMode, WorkItem};
pub use services::verification::{VerificationEngine, VerificationResult};
pub use services::workflow::{WorkflowEngine, WorkflowOptions, WorkflowReport};
pub use utils::error::{EngineError, EngineResult};
